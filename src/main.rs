use sm2shim::{
    common::Messages,
    config::Config,
    renderer::{State, Statics},
    repo::LocalRepo,
    wikitext::render_document,
};
use std::io::Read as _;

fn usage<T>(err: &'static str) -> anyhow::Result<T> {
    let exe = std::env::args().next().unwrap_or_default();
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("Usage: {exe} [options] [input.wikitext]\n");
    println!("Reads from stdin if no input file is given.\n");
    println!("Options:");
    println!("    --config: Player configuration JSON (env: SM2SHIM_CONFIG)");
    println!("    --repo: File repository manifest JSON (env: SM2SHIM_REPO)");
    println!("    --lang: Interface language (env: SM2SHIM_LANG, default: en)");
    println!("    --messages: Message dictionary JSON, overrides --lang");
    println!("    --head: Print collected page data as JSON before the output\n");
    Err(anyhow::Error::msg(err))
}

fn opt_arg(
    args: &mut pico_args::Arguments,
    name: &'static str,
    key: &str,
) -> anyhow::Result<Option<String>> {
    Ok(args
        .opt_value_from_str::<_, String>(name)?
        .or_else(|| std::env::var(key).ok()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return usage("Help requested");
    }

    let config_path = opt_arg(&mut args, "--config", "SM2SHIM_CONFIG")?;
    let repo_path = opt_arg(&mut args, "--repo", "SM2SHIM_REPO")?;
    let lang = opt_arg(&mut args, "--lang", "SM2SHIM_LANG")?;
    let messages_path = args.opt_value_from_str::<_, String>("--messages")?;
    let head = args.contains("--head");
    let _ = args.contains("--");
    let input = args.opt_free_from_str::<String>()?;

    if !args.finish().is_empty() {
        return usage("Unknown extra arguments passed");
    }

    let config = match config_path {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };

    let repo = match repo_path {
        Some(path) => LocalRepo::from_file(&path)?,
        None => LocalRepo::default(),
    };
    log::debug!("Loaded {} files into the repository", repo.len());

    let messages = match messages_path {
        Some(path) => Messages::from_file(&path)?,
        None => Messages::bundled(lang.as_deref().unwrap_or("en")),
    };

    let source = match input.as_deref() {
        None | Some("-") => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            source
        }
        Some(path) => std::fs::read_to_string(path)?,
    };

    let statics = Statics::new(config, messages, repo);
    let mut state = State::new(&statics);
    let output = render_document(&mut state, &source)?;

    if head {
        println!("{}", serde_json::to_string_pretty(&state.globals)?);
    }
    print!("{output}");

    Ok(())
}
