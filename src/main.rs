use std::{io, process};

use clap::{Command, CommandFactory, Parser};
use clap_complete::{generate, Generator};
use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use ucumcheck::cli::args::Cli;
use ucumcheck::cli::commands::execute_command;
use ucumcheck::config::Settings;
use ucumcheck::exitcode;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn main() {
    let cli = Cli::parse();

    if let Some(generator) = cli.generator {
        let mut cmd = Cli::command();
        eprintln!("Generating completion file for {generator:?}...");
        print_completions(generator, &mut cmd);
        return;
    }
    if cli.info {
        if let Some(a) = Cli::command().get_author() {
            println!("AUTHOR: {}", a)
        }
        if let Some(v) = Cli::command().get_version() {
            println!("VERSION: {}", v)
        }
        return;
    }
    if cli.template {
        print!("{}", Settings::template());
        return;
    }

    setup_logging(cli.debug);

    // One read-only snapshot for the whole process.
    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            process::exit(exitcode::CONFIG);
        }
    };

    if cli.show_config {
        match settings.to_toml() {
            Ok(rendered) => {
                println!("{}", rendered);
                return;
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {}", e).red());
                process::exit(exitcode::UNEXPECTED);
            }
        }
    }

    if let Err(e) = execute_command(&cli, &settings) {
        eprintln!("{}", format!("Error: {}", e).red());
        process::exit(e.exit_code());
    }
}

const NOISY_MODULES: [&str; 0] = [];

fn passes_module_filter(target: &str) -> bool {
    !NOISY_MODULES.iter().any(|name| target.starts_with(name))
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Suppress noisy dependency modules; empty means everything passes
    let module_filter = filter_fn(|metadata| passes_module_filter(metadata.target()));

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::ENTER)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucumcheck::util::testing;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        testing::init_test_setup();
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn given_crate_targets_when_filtering_then_events_pass() {
        testing::init_test_setup();
        assert!(passes_module_filter("ucumcheck"));
        assert!(passes_module_filter("ucumcheck::dispatch"));
        assert!(passes_module_filter("ucumcheck::cli::commands"));
    }

    #[test]
    fn given_template_flag_when_parsing_then_flag_is_set() {
        testing::init_test_setup();
        let cli = Cli::parse_from(["ucumcheck", "--template"]);
        assert!(cli.template);
    }
}
