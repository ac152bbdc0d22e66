use clap::Parser;
use miette::Result;
use tracing::Level;

use maintkit::cli::{Cli, Commands, GlobalOpts};

fn main() -> Result<()> {
    // Default SIGPIPE so `maintkit db query ... | head` exits quietly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(&global);

    match cli.command {
        Commands::Init(args) => maintkit::cli::commands::init::run(args),
        Commands::Generate(args) => maintkit::cli::commands::generate::run(args, &global),
        Commands::Load(args) => maintkit::cli::commands::load::run(args, &global),
        Commands::UpdateContent(args) => {
            maintkit::cli::commands::update_content::run(args, &global)
        }
        Commands::Equipment(cmd) => maintkit::cli::commands::equipment::run(cmd, &global),
        Commands::Stock(cmd) => maintkit::cli::commands::stock::run(cmd, &global),
        Commands::Report(cmd) => maintkit::cli::commands::report::run(cmd, &global),
        Commands::Db(cmd) => maintkit::cli::commands::db::run(cmd, &global),
        Commands::Completions(args) => maintkit::cli::commands::completions::run(args),
    }
}

/// Log to stderr so command output on stdout stays pipeable
fn init_tracing(global: &GlobalOpts) {
    let level = if global.verbose {
        Level::DEBUG
    } else if global.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
