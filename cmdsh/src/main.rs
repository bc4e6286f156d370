use clap::Parser;
use cmdsh::{CmdshError, EditorReader, Shell};
use cmdsh_config::CmdshConfig;
use std::sync::Arc;

/// cmdsh - Interactive command shell
#[derive(Parser, Debug)]
#[command(name = "cmdsh", version, about)]
struct Args {
    /// Prompt override
    #[arg(short, long, env = "CMDSH_PROMPT")]
    prompt: Option<String>,

    /// Execute a single line and exit
    #[arg(short = 'c')]
    command: Option<String>,

    /// Config file path
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => cmdsh_config::load_from_file(path).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {e}, using defaults");
            CmdshConfig::default()
        }),
        None => cmdsh_config::load().unwrap_or_default(),
    };

    let filter = if config.logging.filter.is_empty() {
        config.logging.level.as_str().to_string()
    } else {
        format!("{},{}", config.logging.level.as_str(), config.logging.filter)
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let reader = Arc::new(EditorReader::new(&config.shell)?);
    let mut shell = Shell::new(reader.clone());
    shell.set_prompt(args.prompt.unwrap_or_else(|| config.shell.prompt.clone()));

    register_builtins(&mut shell)?;
    reader.set_commands(&shell.registry().names());

    if let Some(line) = args.command {
        if let Err(e) = shell.run_line(&line).await {
            eprintln!("cmdsh: {e}");
            std::process::exit(1);
        }
        return Ok(());
    }

    println!("cmdsh v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for commands, Ctrl-D to quit.");
    println!();

    shell.attach()?;
    let result = shell.run().await;
    shell.detach()?;
    result?;

    Ok(())
}

fn register_builtins(shell: &mut Shell) -> Result<(), CmdshError> {
    shell.command("echo", |sh, _command, argv| async move {
        sh.println(&argv.join(" ")).await
    })?;

    let mut names = shell.registry().names();
    names.push("help".to_string());
    names.sort();
    shell.command("help", move |sh, _command, _argv| {
        let names = names.clone();
        async move {
            sh.println("Available commands:").await?;
            for name in &names {
                sh.println(&format!("  {name}")).await?;
            }
            Ok(())
        }
    })?;

    Ok(())
}
