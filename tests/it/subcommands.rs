use argtree::{Argument, Command, Driver, Flag, RangeValidator, StrChoiceValidator};

pub fn tool() -> Command {
    let jobs = RangeValidator::int(Some(1), Some(64)).unwrap();
    let mut build = Command::new("build");
    build
        .add_flag(Flag::new("release", &["--release"], Driver::on_flag()).unwrap())
        .add_flag(Flag::new("jobs", &["--jobs", "-j"], Driver::scalar_or(jobs, 4)).unwrap());

    let platforms =
        StrChoiceValidator::new(["Android", "iOS"]).unwrap().ignore_case(true).norm_case(true);
    let filter = Argument::new("filter", "FILTER", Driver::values::<String>()).unwrap();
    let mut test = Command::new("test");
    test.add_flag(Flag::new("platform", &["--platform", "-p"], Driver::scalar(platforms)).unwrap())
        .add_argument(filter.multiple(true).required(false));

    let mut tool = Command::new("tool");
    tool.add_flag(Flag::new("verbose", &["--verbose", "-v"], Driver::count_flag()).unwrap())
        .add_flag(Flag::new("help", &["--help", "-h"], Driver::help()).unwrap())
        .add_command(build)
        .add_command(test);
    tool
}

pub fn remote() -> Command {
    let target = Flag::new("target", &["--target"], Driver::value::<String>()).unwrap();
    let mut build = Command::new("build");
    build
        .add_flag(Flag::new("help", &["--help", "-h"], Driver::help()).unwrap())
        .add_flag(target.required(true));

    let host = Flag::new("host", &["--host"], Driver::value::<String>()).unwrap();
    let mut remote = Command::new("remote");
    remote.add_flag(host.required(true)).add_command(build);
    remote
}
