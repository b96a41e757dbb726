//! read command - Resolve a repository and print its report

use std::io::Write;
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::auth::{Auth, AuthConfig};
use crate::core::config::{Config, OutputFormat};
use crate::core::query::RepositoryQuery;
use crate::engine::{self, Context};
use crate::ui::output::{self, Verbosity};

/// Run one query and print the report to stdout.
///
/// Flag values override the config file field by field. Nothing is printed
/// to stdout unless the whole query succeeds.
pub fn read(
    ctx: &Context,
    config_path: Option<&Path>,
    query: RepositoryQuery,
    auth_flags: AuthConfig,
    format: Option<OutputFormat>,
) -> Result<()> {
    let verbosity = Verbosity::from_quiet(ctx.quiet);

    let loaded = Config::load(config_path).context("failed to load configuration")?;
    for warning in &loaded.warnings {
        output::warn(&warning.message, verbosity);
    }
    let config = loaded.config;

    let auth_config = config.auth().clone().overridden_by(auth_flags);
    let auth = Auth::resolve(&auth_config).context("invalid credentials")?;

    let report = engine::read_repository(ctx, &query, &auth)?;

    let format = format.unwrap_or_else(|| config.output_format());
    let rendered = output::render_report(&report, format).context("failed to render report")?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write report")?;

    Ok(())
}
