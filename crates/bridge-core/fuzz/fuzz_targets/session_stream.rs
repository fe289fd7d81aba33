#![no_main]

use bridge_core::{
    execute, read_frame, Bridge, BridgeConfig, Command, Frame, ScratchpadSoc, SessionError,
};
use libfuzzer_sys::fuzz_target;

const MAX_STEP_CYCLES: u32 = 1024;

fuzz_target!(|data: &[u8]| {
    let config = BridgeConfig {
        min_memory_words: 64,
        ..BridgeConfig::default()
    };
    let image: Vec<u32> = data
        .chunks_exact(4)
        .take(16)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    let mut bridge = Bridge::new(ScratchpadSoc::default(), &image, &config);

    let mut input = data;
    loop {
        let command = match read_frame(&mut input) {
            Ok(Frame::Command(Command::Step { cycles })) => Command::Step {
                cycles: cycles % MAX_STEP_CYCLES,
            },
            Ok(Frame::Command(command)) => command,
            Ok(Frame::Unknown(_)) => continue,
            Ok(Frame::Closed) => break,
            Err(SessionError::TruncatedCommand { .. }) => break,
            Err(error) => panic!("in-memory stream failed: {error}"),
        };

        let before = bridge.time();
        let response = execute(&mut bridge, command);
        assert_eq!(response.is_some(), command.expects_response());
        assert!(bridge.time() >= before);
        if response.is_none() {
            break;
        }
    }
});
