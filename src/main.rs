use std::io;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{Level, info};

use knightmare_console::{Mode, Session, SessionConfig};
use knightmare_core::Side;

const USAGE: &str = "\
usage: knightmare [options]
  --mode ai|human|pvp engine against itself, against you, or two players
                      at one console (default ai)
  --depth N           search depth in plies, at least 1 (default 4)
  --ply-limit N       plies before the game is drawn (default 250)
  --human white|black your side in human mode (default white)
  --fen FEN           starting position
  --movetime MS       stop each search after MS milliseconds
  --verbose           log search details to stderr";

struct Args {
    session: SessionConfig,
    verbose: bool,
}

fn value<'a>(flag: &str, rest: &mut impl Iterator<Item = &'a String>) -> Result<&'a str> {
    rest.next()
        .map(String::as_str)
        .with_context(|| format!("{flag} needs a value\n{USAGE}"))
}

fn parse_args(argv: &[String]) -> Result<Option<Args>> {
    let mut session = SessionConfig::default();
    let mut verbose = false;
    let mut rest = argv.iter();

    while let Some(flag) = rest.next() {
        match flag.as_str() {
            "--mode" => {
                session.mode = match value(flag, &mut rest)? {
                    "ai" | "1" => Mode::AiVsAi,
                    "human" | "2" => Mode::HumanVsAi,
                    "pvp" | "3" => Mode::HumanVsHuman,
                    other => bail!("unknown mode \"{other}\"\n{USAGE}"),
                }
            }
            "--depth" => {
                let text = value(flag, &mut rest)?;
                let depth: u8 = text.parse().with_context(|| format!("invalid depth \"{text}\""))?;
                if depth == 0 {
                    bail!("depth must be at least 1");
                }
                session.search.depth = depth;
            }
            "--ply-limit" => {
                let text = value(flag, &mut rest)?;
                session.ply_limit =
                    text.parse().with_context(|| format!("invalid ply limit \"{text}\""))?;
            }
            "--human" => {
                session.human = match value(flag, &mut rest)? {
                    "white" | "w" => Side::White,
                    "black" | "b" => Side::Black,
                    other => bail!("unknown side \"{other}\"\n{USAGE}"),
                }
            }
            "--fen" => session.fen = Some(value(flag, &mut rest)?.to_string()),
            "--movetime" => {
                let text = value(flag, &mut rest)?;
                let ms: u64 = text.parse().with_context(|| format!("invalid movetime \"{text}\""))?;
                session.limits.max_time = Some(Duration::from_millis(ms));
            }
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => return Ok(None),
            other => bail!("unknown argument \"{other}\"\n{USAGE}"),
        }
    }
    Ok(Some(Args { session, verbose }))
}

fn main() -> Result<()> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = parse_args(&argv)? else {
        println!("{USAGE}");
        return Ok(());
    };

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
    info!(config = ?args.session, "knightmare starting");

    println!("Welcome to Knightmare");
    let stdin = io::stdin();
    let mut session = Session::new(args.session, stdin.lock(), io::stdout())?;
    let status = session.run()?;
    info!(%status, "knightmare shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn defaults_without_flags() {
        let parsed = parse_args(&[]).unwrap().unwrap();
        assert_eq!(parsed.session, SessionConfig::default());
        assert!(!parsed.verbose);
    }

    #[test]
    fn flags_fill_the_session_config() {
        let parsed = parse_args(&args("--mode human --depth 3 --ply-limit 40 --human black -v"))
            .unwrap()
            .unwrap();
        assert_eq!(parsed.session.mode, Mode::HumanVsAi);
        assert_eq!(parsed.session.search.depth, 3);
        assert_eq!(parsed.session.ply_limit, 40);
        assert_eq!(parsed.session.human, Side::Black);
        assert!(parsed.verbose);
    }

    #[test]
    fn mode_accepts_names_and_numbers() {
        for (text, mode) in [
            ("ai", Mode::AiVsAi),
            ("2", Mode::HumanVsAi),
            ("pvp", Mode::HumanVsHuman),
            ("3", Mode::HumanVsHuman),
        ] {
            let parsed = parse_args(&args(&format!("--mode {text}"))).unwrap().unwrap();
            assert_eq!(parsed.session.mode, mode, "--mode {text}");
        }
    }

    #[test]
    fn fen_takes_one_argument() {
        let argv = vec!["--fen".to_string(), "7k/8/5K2/6Q1/8/8/8/8 w".to_string()];
        let parsed = parse_args(&argv).unwrap().unwrap();
        assert_eq!(parsed.session.fen.as_deref(), Some("7k/8/5K2/6Q1/8/8/8/8 w"));
    }

    #[test]
    fn bad_flags_are_rejected() {
        assert!(parse_args(&args("--depth 0")).is_err());
        assert!(parse_args(&args("--depth")).is_err());
        assert!(parse_args(&args("--mode chess")).is_err());
        assert!(parse_args(&args("--castle")).is_err());
        assert!(parse_args(&args("--help")).unwrap().is_none());
    }
}
