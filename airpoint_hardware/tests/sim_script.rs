use airpoint_hardware::SimulatedWand;
use airpoint_traits::LineSource;
use rstest::rstest;

#[rstest]
#[case(0, [0, 0, 0, 0])]
#[case(550, [0, 0, 1, 0])]
#[case(1550, [0, 1, 0, 0])]
#[case(1700, [0, 0, 0, 0])]
#[case(3500, [0, 1, 0, 0])]
#[case(4550, [1, 0, 0, 0])]
#[case(5050, [0, 0, 0, 1])]
#[case(5550, [0, 0, 1, 0])]
#[case(6550, [0, 0, 1, 0])]
fn script_is_periodic(#[case] t_ms: u64, #[case] expected: [u8; 4]) {
    assert_eq!(SimulatedWand::script_buttons(t_ms), expected);
}

#[test]
fn noise_lines_are_interleaved() {
    let mut sim = SimulatedWand::new(100).unpaced().with_noise_every(3);
    let lines: Vec<String> = (0..6)
        .map(|_| String::from_utf8(sim.read_line().unwrap().unwrap()).unwrap())
        .collect();
    assert!(lines[0].starts_with("RX"));
    assert!(lines[1].starts_with("RX"));
    assert!(!lines[2].starts_with("RX"));
    assert!(!lines[5].starts_with("RX"));
}

#[test]
fn describe_mentions_rate() {
    let sim = SimulatedWand::new(50);
    assert!(sim.describe().contains("50 Hz"));
}
