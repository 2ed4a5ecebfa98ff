fn main() -> anyhow::Result<()> {
    stream_mode_lib::run()
}
