fn main() -> anyhow::Result<()> {
    tg2md::cli::run()
}
