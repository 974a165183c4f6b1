use clap::{App, Arg, ArgMatches};
use std::io::{self, IsTerminal};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn parse(value: &str) -> Result<ColorChoice, String> {
        match value {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(format!("unknown color choice `{}`", other)),
        }
    }

    pub fn enabled(&self) -> bool {
        match *self {
            ColorChoice::Auto => io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    pub color: ColorChoice,
    pub tests_path: Option<String>,
    pub list: bool,
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("regtest")
        .version(crate_version!())
        .about("Runs every self-registered unit test")
        .arg(Arg::with_name("color")
             .long("color")
             .takes_value(true)
             .possible_values(&["auto", "always", "never"])
             .default_value("auto")
             .help("Colors test results"))
        .arg(Arg::with_name("tests-path")
             .long("tests-path")
             .takes_value(true)
             .help("Location of the tests (currently ignored)"))
        .arg(Arg::with_name("list")
             .long("list")
             .help("Lists registered tests instead of running them"))
}

impl Options {
    pub fn from_args() -> Result<Options, String> {
        Options::from_matches(&app().get_matches())
    }

    fn from_matches(matches: &ArgMatches) -> Result<Options, String> {
        Ok(Options {
            color: ColorChoice::parse(matches.value_of("color").unwrap_or("auto"))?,
            tests_path: matches.value_of("tests-path").map(|path| path.to_string()),
            list: matches.is_present("list"),
        })
    }
}

#[cfg(test)]
fn parse(args: &[&str]) -> Options {
    let matches = app().get_matches_from_safe(args).unwrap();
    Options::from_matches(&matches).unwrap()
}

#[test]
fn test_defaults() {
    let options = parse(&["regtest"]);
    assert_eq!(options, Options { color: ColorChoice::Auto, tests_path: None, list: false });
}

#[test]
fn test_all_options() {
    let options = parse(&["regtest", "--color", "never", "--tests-path", "tests", "--list"]);
    assert_eq!(options.color, ColorChoice::Never);
    assert!(!options.color.enabled());
    assert_eq!(options.tests_path, Some("tests".to_string()));
    assert!(options.list);
}

#[test]
fn test_rejects_unknown_color() {
    assert!(app().get_matches_from_safe(&["regtest", "--color", "purple"]).is_err());
    assert!(ColorChoice::parse("purple").is_err());
}
