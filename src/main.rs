use clap::Parser;
use snafu::ErrorCompat;

mod args;
mod informe;

fn main() {
    let args = args::Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    match informe::run_report(&args) {
        Ok(summary) => {
            println!(
                "Informe generado: {} ({} preguntas, {} respuestas)",
                summary.output_name, summary.total_questions, summary.total_rows
            );
        }
        Err(e) => {
            eprintln!("An error occured {}", e);
            if let Some(bt) = ErrorCompat::backtrace(&e) {
                eprintln!("trace: {}", bt);
            }
            std::process::exit(1);
        }
    }
}
