use std::process::ExitCode;

use anyhow::Context;
use argot_input::AppSettingSource;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut builder = calc_example::builder().env_vars(true);
    if let Ok(path) = std::env::var("CALC_CONFIG") {
        let settings = AppSettingSource::from_file(&path)
            .with_context(|| format!("loading settings from {path}"))?;
        builder = builder.app_settings(settings.with_conventions(true));
    }
    let app = builder.build()?;

    let code = app.run(std::env::args().skip(1));
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
