// Main CLI entry point for rfiscan
// Uses clap for argument parsing

use clap::{Arg, Command};
use rfiscan::engine::{HttpEngine, DEFAULT_TIMEOUT_SECS};
use rfiscan::models::{Evasion, Finding, Method};
use rfiscan::probe::TEST_SCRIPT;
use rfiscan::reporting::{export_csv, export_json, export_markdown};
use rfiscan::scanner::{ErrorPolicy, ScanConfig, Scanner};

fn print_finding(finding: &Finding) {
    println!(
        "[VULNERABLE] param: {} evasion: {} url: {}",
        finding.param, finding.evasion, finding.inclusion_url
    );
}

#[tokio::main]
async fn main() {
    let matches = Command::new("rfiscan")
        .version("0.1.0")
        .about("Remote File Inclusion (RFI) vulnerability probe")
        .after_help("EXAMPLES:\n  rfiscan \"https://example.com/page.php?id=1\"\n  rfiscan \"https://example.com/page.php?q=a&vuln=b\" --param vuln --evasion null-byte\n  rfiscan \"https://example.com/page.php?id=1\" --all --continue-on-error --csv-report\n\nEVASIONS:\n  none             include the script URL unchanged\n  null-byte        append %00 to truncate appended suffixes\n  double-encode    percent-encode the script URL twice")
        .arg(Arg::new("url")
            .required(true)
            .num_args(1)
            .help("Target URL with query parameters"))
        .arg(Arg::new("param")
            .short('p')
            .long("param")
            .num_args(1)
            .action(clap::ArgAction::Append)
            .help("Query parameter to test (repeatable; default: all in the URL)"))
        .arg(Arg::new("evasion")
            .short('e')
            .long("evasion")
            .num_args(1)
            .help("Evasion mode: none, null-byte, or double-encode (default: try all)"))
        .arg(Arg::new("script")
            .short('s')
            .long("script")
            .num_args(1)
            .default_value(TEST_SCRIPT)
            .help("URL of the RFI test script"))
        .arg(Arg::new("method")
            .short('m')
            .long("method")
            .num_args(1)
            .default_value("GET")
            .help("HTTP method for inclusion requests (GET or POST)"))
        .arg(Arg::new("timeout")
            .short('t')
            .long("timeout")
            .num_args(1)
            .help("Request timeout in seconds (default: 10)"))
        .arg(Arg::new("all")
            .long("all")
            .action(clap::ArgAction::SetTrue)
            .help("Test every combination instead of stopping at the first finding"))
        .arg(Arg::new("continue_on_error")
            .long("continue-on-error")
            .action(clap::ArgAction::SetTrue)
            .help("Skip combinations that fail at the transport level"))
        .arg(Arg::new("csv_report")
            .long("csv-report")
            .action(clap::ArgAction::SetTrue)
            .help("Write findings to a CSV report"))
        .arg(Arg::new("markdown_report")
            .long("markdown-report")
            .action(clap::ArgAction::SetTrue)
            .help("Write findings to a Markdown report"))
        .arg(Arg::new("json_report")
            .long("json-report")
            .action(clap::ArgAction::SetTrue)
            .help("Write findings to a JSON report"))
        .get_matches();

    let url = matches.get_one::<String>("url").expect("url is required");
    let script = matches.get_one::<String>("script").expect("script has a default");

    let evasions = match matches.get_one::<String>("evasion") {
        Some(name) => match Evasion::parse(name) {
            Some(evasion) => vec![evasion],
            None => {
                eprintln!("Unknown evasion mode: {}. Use none, null-byte, or double-encode.", name);
                std::process::exit(2);
            }
        },
        None => Evasion::ALL.to_vec(),
    };

    let method_name = matches.get_one::<String>("method").expect("method has a default");
    let method = match Method::parse(method_name) {
        Some(method) => method,
        None => {
            eprintln!("Unsupported method: {}. Use GET or POST.", method_name);
            std::process::exit(2);
        }
    };

    let timeout = match matches.get_one::<String>("timeout") {
        Some(secs) => match secs.parse::<u64>() {
            Ok(secs) => secs,
            Err(_) => {
                eprintln!("Invalid timeout: {}", secs);
                std::process::exit(2);
            }
        },
        None => DEFAULT_TIMEOUT_SECS,
    };

    let params = matches
        .get_many::<String>("param")
        .map(|values| values.cloned().collect::<Vec<String>>());

    let error_policy = if matches.get_flag("continue_on_error") {
        ErrorPolicy::Skip
    } else {
        ErrorPolicy::FailFast
    };

    let engine = match HttpEngine::new(timeout) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let config = ScanConfig {
        test_script: script.clone(),
        method,
        evasions,
        params,
        error_policy,
    };
    let scanner = Scanner::with_config(engine, config);

    println!("Scanning {} for RFI...", url);

    let findings = if matches.get_flag("all") {
        match scanner.scan(url, print_finding).await {
            Ok(findings) => findings,
            Err(e) => {
                eprintln!("Scan failed: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match scanner.find_first(url).await {
            Ok(Some(finding)) => {
                print_finding(&finding);
                vec![finding]
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                eprintln!("Scan failed: {}", e);
                std::process::exit(1);
            }
        }
    };

    if findings.is_empty() {
        println!("[NOT VULNERABLE] {}", url);
    }

    if matches.get_flag("csv_report") {
        match export_csv(&findings) {
            Ok(filename) => println!("CSV report written to {}", filename),
            Err(e) => eprintln!("Failed to write CSV report: {}", e),
        }
    }
    if matches.get_flag("markdown_report") {
        match export_markdown(&findings) {
            Ok(filename) => println!("Markdown report written to {}", filename),
            Err(e) => eprintln!("Failed to write Markdown report: {}", e),
        }
    }
    if matches.get_flag("json_report") {
        match export_json(&findings) {
            Ok(filename) => println!("JSON report written to {}", filename),
            Err(e) => eprintln!("Failed to write JSON report: {}", e),
        }
    }
}
