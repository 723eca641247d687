use hidapi::HidApi;
use minidsp_2x4hd::{MINIDSP_2X4HD_PID, MINIDSP_VID, Session, hid::HidTransport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simplelog::TermLogger::init(
        log::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Always,
    )?;

    let api = HidApi::new()?;
    let device = api.open(MINIDSP_VID, MINIDSP_2X4HD_PID)?;

    let mut session = Session::new(HidTransport::new(device));
    session.callback_on_change();
    session.on_source_change(|source| println!("source: {source}"));
    session.on_volume_change(|volume| println!("volume: -{}dB", volume as f32 / 2.0));
    session.on_mute_change(|muted| println!("muted: {muted}"));
    session.on_input_levels(|levels| println!("inputs: {levels:?}"));
    session.on_output_levels(|levels| println!("outputs: {levels:?}"));

    session.initialized(MINIDSP_VID, MINIDSP_2X4HD_PID);
    session.request_status()?;
    while session.poll(500)?.is_some() {}

    session.request_levels()?;
    session.poll(500)?;

    println!("{:?}", session.state());

    Ok(())
}
