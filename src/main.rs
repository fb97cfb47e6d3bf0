use std::io;
use std::process::ExitCode;

use clap::Parser;
use emx_timeline::{locale, Cli, Command, Language, Messages, ResolveContext, Settings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = match ResolveContext::new(cli.vault.as_deref(), cli.config.as_deref(), cli.json) {
        Ok(ctx) => ctx,
        Err(e) => return fail(&e, Language::default()),
    };

    // Config commands must work even when the settings file is broken
    if let Command::Config(action) = cli.command {
        let language = ctx.load_settings().map(|s| s.language).unwrap_or_default();
        return match cmd::config::run(&ctx, action) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(&e, language),
        };
    }

    let settings = match ctx.load_settings() {
        Ok(settings) => settings,
        Err(e) => return fail(&e, Language::default()),
    };

    match dispatch(&ctx, &settings, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e, settings.language),
    }
}

fn dispatch(ctx: &ResolveContext, settings: &Settings, command: Command) -> io::Result<()> {
    match command {
        Command::View { html, source } => cmd::view::run(ctx, settings, &source, html.as_deref()),
        Command::Generate { source } => cmd::generate::run(ctx, settings, &source),
        Command::Reopen { file, regenerate } => cmd::reopen::run(ctx, settings, &file, regenerate),
        Command::Open { note } => cmd::open::run(ctx, &note),
        Command::Tags => cmd::tags::run(ctx),
        Command::Folders => cmd::folders::run(ctx),
        Command::Config(action) => cmd::config::run(ctx, action),
    }
}

/// Log the error, print a localized notice and exit with status 1
fn fail(error: &io::Error, language: Language) -> ExitCode {
    tracing::error!(kind = ?error.kind(), error = %error, "command failed");
    let messages = Messages::for_language(language);
    eprintln!("{}", locale::fill(messages.command_failed, "error", &error.to_string()));
    ExitCode::FAILURE
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

mod cmd {
    pub mod config;
    pub mod folders;
    pub mod generate;
    pub mod open;
    pub mod reopen;
    pub mod tags;
    pub mod view;
}
