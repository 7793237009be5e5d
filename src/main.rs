fn main() -> anyhow::Result<()> {
    swingsage_lib::run()
}
