use std::io::{self, BufWriter, Write};

use tracing_subscriber::EnvFilter;
use tutor::cli;
use tutor::demo::{self, DemoError};

fn main() {
    // Diagnostics go to stderr so stdout stays exactly the demo output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("tutor: {e}");
            eprintln!("{}", cli::USAGE);
            std::process::exit(1);
        }
    };

    if args.help {
        println!("{}", cli::USAGE);
        return;
    }

    let mut out = BufWriter::new(io::stdout().lock());
    let result = if args.list {
        demo::list(&mut out).map_err(DemoError::from)
    } else if args.steps.is_empty() {
        demo::run(demo::default_steps(), &mut out)
    } else {
        demo::select(&args.steps).and_then(|steps| demo::run(steps, &mut out))
    };

    if let Err(e) = result.and_then(|()| out.flush().map_err(DemoError::from)) {
        eprintln!("tutor: {e}");
        if matches!(e, DemoError::UnknownStep(_)) {
            eprintln!("{}", cli::USAGE);
        }
        std::process::exit(1);
    }
}
