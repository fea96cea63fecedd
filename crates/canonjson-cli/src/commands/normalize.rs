use super::{execute_batch, json_pretty, print_outcomes, report_exit_code, report_json};
use canonjson_core::Mode;

pub fn run(inputs: &[String], sort_keys: bool, json: bool) -> Result<u8, String> {
    let report = execute_batch(inputs, Mode::Rewrite, sort_keys, json)?;

    if json {
        println!("{}", json_pretty(&report_json(&report))?);
    } else {
        print_outcomes(&report);
        println!(
            "normalize: {} checked, {} rewritten, {} unchanged, {} failed",
            report.checked(),
            report.rewritten(),
            report.unchanged(),
            report.failed()
        );
        if report.interrupted {
            println!("normalize: interrupted, remaining files were not processed");
        }
    }

    Ok(report_exit_code(&report))
}
