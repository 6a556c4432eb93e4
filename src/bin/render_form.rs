//! Renders one chart from `key=value` form parameters and prints its URL.
//!
//! ```text
//! render_form [--config service.json] [--public-root DIR] [--origin URL]
//!             [--print-form] [--verbose] [key=value ...]
//! ```

use std::path::PathBuf;

use cairo_graph_web::api::{FormParams, RequestHandler, RequestOrigin, ServiceConfig, SubmissionOutcome};
use cairo_graph_web::render::CairoBackend;
use cairo_graph_web::telemetry;

const USAGE: &str = "usage: render_form [--config FILE] [--public-root DIR] \
[--origin http://HOST[:PORT][/MOUNT]] [--print-form] [--verbose] [key=value ...]";

#[derive(Debug)]
struct CliArgs {
    config_path: Option<PathBuf>,
    public_root: Option<PathBuf>,
    origin: RequestOrigin,
    print_form: bool,
    verbose: bool,
    params: FormParams,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let _ = if args.verbose {
        telemetry::init_tracing_with_fallback("info,cairo_graph_web=debug")
    } else {
        telemetry::init_default_tracing()
    };

    let mut config = match &args.config_path {
        Some(path) => ServiceConfig::from_json_file(path).map_err(|err| err.to_string())?,
        None => ServiceConfig::default(),
    };
    if let Some(root) = args.public_root {
        config.public_root = root;
    }

    let handler =
        RequestHandler::new(config, CairoBackend::new()).map_err(|err| err.to_string())?;

    if args.print_form {
        let context = handler.form_context(None);
        let json = serde_json::to_string_pretty(&context)
            .map_err(|err| format!("failed to serialize form context: {err}"))?;
        println!("{json}");
        return Ok(());
    }

    match handler.respond(&args.params, &args.origin) {
        SubmissionOutcome::Rendered { url, .. } => {
            println!("{url}");
            Ok(())
        }
        SubmissionOutcome::Failed { message, .. } => Err(message),
    }
}

fn parse_args() -> Result<CliArgs, String> {
    let mut config_path = None;
    let mut public_root = None;
    let mut origin = RequestOrigin::new("http", "localhost", 80);
    let mut print_form = false;
    let mut verbose = false;
    let mut params = FormParams::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(PathBuf::from(next_value(&mut args, "--config")?));
            }
            "--public-root" => {
                public_root = Some(PathBuf::from(next_value(&mut args, "--public-root")?));
            }
            "--origin" => {
                origin = parse_origin(&next_value(&mut args, "--origin")?)?;
            }
            "--print-form" => print_form = true,
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => {
                let Some((key, value)) = other.split_once('=') else {
                    return Err(format!("unexpected argument `{other}`\n{USAGE}"));
                };
                params.insert(key, value);
            }
        }
    }

    Ok(CliArgs {
        config_path,
        public_root,
        origin,
        print_form,
        verbose,
        params,
    })
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("missing value for `{flag}`"))
}

/// Accepts `scheme://host[:port][/mount]`.
fn parse_origin(raw: &str) -> Result<RequestOrigin, String> {
    let (scheme, rest) = raw
        .split_once("://")
        .ok_or_else(|| format!("origin `{raw}` must look like scheme://host"))?;
    let (authority, mount) = match rest.find('/') {
        Some(index) => rest.split_at(index),
        None => (rest, ""),
    };
    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| format!("origin port `{port}` is not a valid port"))?;
            (host, port)
        }
        None => match scheme {
            "http" => (authority, 80),
            _ => return Err(format!("origin `{raw}` needs an explicit port")),
        },
    };
    if host.is_empty() {
        return Err(format!("origin `{raw}` has no host"));
    }

    Ok(RequestOrigin::new(scheme, host, port).with_script_name(mount))
}
