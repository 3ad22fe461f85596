use render_engine::{config::Config, driver};

fn main() -> anyhow::Result<()> {
    let config = Config::from_args(std::env::args_os().skip(1));
    driver::run(config)
}
