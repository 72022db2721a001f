use std::process::ExitCode;

fn main() -> ExitCode {
    dbt_lineage::cli::run()
}
