//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{printer, TreeDocument, TreeStats};
use crate::cli::args::{Cli, Commands, Format};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::{Ast, NodeId, NodeKind};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Kinds) => _kinds(),
        Some(Commands::Render { file, format }) => {
            let settings = Settings::load(cli.config.as_deref())?;
            _render(file, *format, &settings)
        }
        Some(Commands::Stats { file }) => _stats(file),
        Some(Commands::Config) => {
            let settings = Settings::load(cli.config.as_deref())?;
            _config(&settings)
        }
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Err(CliError::Usage(
            "no command given, see `astree --help`".into(),
        )),
    }
}

/// Load a document into a fresh store.
fn load_tree(file: &Path) -> CliResult<(Ast, NodeId)> {
    let doc = TreeDocument::load(file)?;
    let mut ast = Ast::new();
    let root = doc.build(&mut ast, file)?;
    Ok((ast, root))
}

#[instrument]
fn _kinds() -> CliResult<()> {
    output::header("Node kinds");
    for kind in NodeKind::ALL {
        output::row(kind.name(), 12, &kind.category());
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _render(file: &Path, format: Format, settings: &Settings) -> CliResult<()> {
    let (ast, root) = load_tree(file)?;
    let rendered = match format {
        Format::Text => printer::render_text(&ast, root, &settings.text)?,
        Format::Dot => printer::render_dot(&ast, root, &settings.graph)?,
        Format::Tree => {
            printer::to_term_tree(&ast, root, settings.text.show_payload)?.to_string()
        }
    };
    output::info(rendered.trim_end());

    let released = ast.destroy();
    debug!("released {} nodes", released);
    Ok(())
}

#[instrument]
fn _stats(file: &Path) -> CliResult<()> {
    let (mut ast, root) = load_tree(file)?;
    let stats = TreeStats::collect(&ast, root)?;
    output::info(&stats);

    let freed = ast
        .free_tree(root)
        .map_err(|e| CliError::Application(e.into()))?;
    debug!("freed {} nodes", freed);
    Ok(())
}

#[instrument(skip(settings))]
fn _config(settings: &Settings) -> CliResult<()> {
    output::info(settings.to_toml()?.trim_end());
    Ok(())
}

#[instrument]
fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
