mod smoke;
mod subcommands;
mod clusters;

use argtree::{Command, ErrorKind, Source};
use expect_test::{expect, Expect};

fn args(args: &str) -> Vec<String> {
    args.split_ascii_whitespace().map(String::from).collect()
}

fn check(grammar: fn() -> Command, args: &str, expect: Expect) {
    let mut cmd = grammar();
    let args = self::args(args);
    match argtree::parse(&mut cmd, &args) {
        Ok(path) => expect.assert_eq(&render(&cmd, &path)),
        Err(err) => expect.assert_eq(&err.to_string()),
    }
}

/// `name [dest=value, ...]` for every command on the selected path.
fn render(cmd: &Command, path: &[String]) -> String {
    (0..=path.len())
        .filter_map(|depth| cmd.find(&path[..depth]))
        .map(|node| {
            let drivers = node
                .drivers()
                .map(|(dest, driver)| format!("{dest}={driver:?}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} [{drivers}]", node.name())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn smoke() {
    check(smoke::counter, "-cc --name x", expect![[r#"cmd [count=2, name="x"]"#]]);
    check(smoke::counter, "--name x -c", expect![[r#"cmd [count=1, name="x"]"#]]);
    check(smoke::counter, "-n x --name=y", expect![[r#"cmd [count=0, name="y"]"#]]);
    check(smoke::counter, "", expect!["Option is required: `--name`"]);
    check(smoke::counter, "-n", expect!["Option `-n` requires a value"]);
    check(smoke::counter, "--nope", expect!["Unknown option: `--nope`"]);
    check(smoke::counter, "-n x stray", expect!["Too many arguments: `stray`"]);
}

#[test]
fn counter_state() {
    let mut cmd = smoke::counter();
    argtree::parse(&mut cmd, &args("-cc --name x")).unwrap();

    let count = cmd.driver("count").unwrap();
    assert_eq!((count.get::<u32>(), count.present()), (Some(&2), true));
    let name = cmd.driver("name").unwrap();
    assert_eq!(name.get::<String>().map(String::as_str), Some("x"));
    assert_eq!((name.present(), name.source()), (true, Source::Cli));
}

#[test]
fn unknown_option_leaves_drivers_alone() {
    let mut cmd = smoke::counter();
    let err = argtree::parse(&mut cmd, &args("--nope")).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::UnknownOption));
    assert!(cmd.drivers().all(|(_, driver)| !driver.present()));
}

#[test]
fn positionals() {
    check(smoke::echo, "hi", expect![[r#"echo [text="hi", upper=false]"#]]);
    check(smoke::echo, "-- -weird", expect![[r#"echo [text="-weird", upper=false]"#]]);
    check(smoke::echo, "-u -- -u", expect![[r#"echo [text="-u", upper=true]"#]]);
    check(smoke::echo, "-", expect!["Argument is required: `TEXT`"]);
    check(smoke::echo, "- -u hi", expect![[r#"echo [text="hi", upper=true]"#]]);
    check(smoke::echo, "-- -", expect![[r#"echo [text="-", upper=false]"#]]);
    check(smoke::echo, "-weird", expect!["Unknown option: `-w`"]);
    check(smoke::echo, "", expect!["Argument is required: `TEXT`"]);
    check(smoke::echo, "a -- b", expect!["Too many arguments: `b`"]);
}

#[test]
fn subcommands() {
    check(
        subcommands::tool,
        "build",
        expect!["tool [verbose=0, help=<help>] build [release=false, jobs=4]"],
    );
    check(
        subcommands::tool,
        "-v build --release -j 8",
        expect!["tool [verbose=1, help=<help>] build [release=true, jobs=8]"],
    );
    check(
        subcommands::tool,
        "test -p ios a b",
        expect![[r#"tool [verbose=0, help=<help>] test [filter=["a", "b"], platform="iOS"]"#]],
    );
    check(
        subcommands::tool,
        "-- test",
        expect!["tool [verbose=0, help=<help>] test [filter=[], platform=None]"],
    );
    check(subcommands::tool, "", expect!["A subcommand is required"]);
    check(subcommands::tool, "-vv", expect!["A subcommand is required"]);
    check(subcommands::tool, "deploy", expect!["Unknown command: `deploy`"]);
    check(subcommands::tool, "build -v", expect!["Unknown option: `-v`"]);
    check(
        subcommands::tool,
        "build -j 0",
        expect!["Can't parse `-j`, '0' must be greater than or equal to 1."],
    );
    check(
        subcommands::tool,
        "test --platform windows",
        expect!["Can't parse `--platform`, 'windows' is not one of 'Android', 'iOS'."],
    );
    check(subcommands::tool, "--help build", expect!["help"]);
}

#[test]
fn subcommand_path() {
    let mut tool = subcommands::tool();
    let path = argtree::parse(&mut tool, &args("build")).unwrap();
    assert_eq!(path, ["build"]);
    let build = tool.find(&path).unwrap();
    assert!(build.is_leaf());
    assert_eq!(build.get::<i64>("jobs"), Some(&4));
    assert_eq!(build.driver("jobs").map(|it| it.source()), Some(Source::Default));
    assert!(tool.find(&["test"]).unwrap().drivers().all(|(_, it)| !it.present()));
}

#[test]
fn help_is_a_message() {
    let mut tool = subcommands::tool();
    let err = argtree::parse(&mut tool, &args("-h build --release")).unwrap_err();
    assert!(err.is_message());
    assert_eq!(err.status(), 0);
    assert_eq!(err.kind(), None);
}

#[test]
fn nested_help() {
    check(subcommands::remote, "build --help", expect!["help"]);
    check(subcommands::remote, "build", expect!["Option is required: `--host`"]);
    check(subcommands::remote, "--host h build", expect!["Option is required: `--target`"]);

    let mut remote = subcommands::remote();
    let err = argtree::parse(&mut remote, &args("build -h --bogus")).unwrap_err();
    assert!(err.is_message());
    assert_eq!((err.status(), err.kind()), (0, None));
    assert!(!remote.is_present("host"));
    assert!(remote.find(&["build"]).unwrap().is_present("help"));
}

#[test]
fn clusters() {
    check(clusters::cmd, "-ab", expect!["cmd [a=true, b=true, out=None, foo=None, quiet=true]"]);
    check(
        clusters::cmd,
        "-abo x",
        expect![[r#"cmd [a=true, b=true, out="x", foo=None, quiet=true]"#]],
    );
    check(
        clusters::cmd,
        "-aboxyz",
        expect![[r#"cmd [a=true, b=true, out="xyz", foo=None, quiet=true]"#]],
    );
    check(
        clusters::cmd,
        "-oa -q",
        expect![[r#"cmd [a=false, b=false, out="a", foo=None, quiet=false]"#]],
    );
    check(
        clusters::cmd,
        "--out --foo",
        expect![[r#"cmd [a=false, b=false, out="--foo", foo=None, quiet=true]"#]],
    );
    check(
        clusters::cmd,
        "--foo= --out=a=b",
        expect![[r#"cmd [a=false, b=false, out="a=b", foo="", quiet=true]"#]],
    );
    check(clusters::cmd, "-ac", expect!["Unknown option: `-c`"]);
    check(clusters::cmd, "-b=1", expect!["Unknown option: `-=`"]);
    check(clusters::cmd, "--a", expect!["Unknown option: `--a`"]);
    check(clusters::cmd, "--out", expect!["Option `--out` requires a value"]);
    check(clusters::cmd, "--quiet=no", expect!["Option `--quiet` does not take a value"]);
}

#[test]
fn equivalent_spellings() {
    let state = |line: &str| {
        let mut cmd = clusters::cmd();
        argtree::parse(&mut cmd, &args(line)).unwrap();
        cmd.drivers()
            .map(|(dest, it)| format!("{dest}={it:?}/{}/{:?}", it.count(), it.source()))
            .collect::<Vec<_>>()
    };
    assert_eq!(state("--foo v"), state("--foo=v"));
    assert_eq!(state("-ab"), state("-a -b"));
    assert_eq!(state("-ovalue"), state("-o value"));
}
