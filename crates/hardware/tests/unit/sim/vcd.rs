//! # Waveform Writer Tests
//!
//! Verifies the VCD header, the initial `$dumpvars` block and change-only dumps.

use cosim_core::common::{HarnessError, Level};
use cosim_core::core::{CoreInputs, CoreOutputs};
use cosim_core::sim::vcd::{PROBES, Sample, VcdWriter, sample};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::common::mocks::output::FailingWriter;

const HEADER: &str = "\
$version cosim $end
$timescale 1ns $end
$scope module top $end
$var wire 1 ! clk $end
$var wire 1 \" reset $end
$var wire 1 # interrupt $end
$var wire 32 $ instruction_address $end
$var wire 32 % instruction $end
$var wire 32 & address $end
$var wire 3 ' device_select $end
$var wire 1 ( write_enable $end
$var wire 4 ) write_strobe $end
$var wire 32 * write_data $end
$var wire 32 + read_data $end
$upscope $end
$enddefinitions $end
";

fn reset_sample() -> Sample {
    [0, 1, 0, 0x1000, 0, 0, 0, 0, 0, 0, 0]
}

fn text(writer: VcdWriter<Vec<u8>>) -> String {
    String::from_utf8(writer.finish().unwrap()).unwrap()
}

#[test]
fn test_header_declares_every_probe() {
    let writer = VcdWriter::new(Vec::new()).unwrap();
    assert_eq!(text(writer), HEADER);
    assert_eq!(PROBES.len(), 11);
}

#[test]
fn test_first_dump_lists_all_values() {
    let mut writer = VcdWriter::new(Vec::new()).unwrap();
    writer.dump(0, &reset_sample()).unwrap();
    let body = text(writer);
    assert_eq!(
        &body[HEADER.len()..],
        "#0\n$dumpvars\n0!\n1\"\n0#\nb1000000000000 $\nb0 %\nb0 &\nb0 '\n0(\nb0 )\nb0 *\nb0 +\n$end\n"
    );
}

#[test]
fn test_later_dumps_carry_only_changes() {
    let mut writer = VcdWriter::new(Vec::new()).unwrap();
    let mut values = reset_sample();
    writer.dump(0, &values).unwrap();
    let prefix = text(VcdWriter::new(Vec::new()).unwrap()).len();

    values[0] = 1;
    writer.dump(1, &values).unwrap();
    values[6] = 2;
    values[8] = 0b1111;
    writer.dump(2, &values).unwrap();
    writer.dump(3, &values).unwrap();

    let body = text(writer);
    let tail = body[prefix..].split("$end\n").nth(1).unwrap().to_string();
    assert_eq!(tail, "#1\n1!\n#2\nb10 '\nb1111 )\n#3\n");
}

#[test]
fn test_sample_maps_pins() {
    let inputs = CoreInputs {
        clock: Level::High,
        reset: false,
        interrupt: true,
        instruction: 0x13,
        read_data: 0x55,
        ..CoreInputs::default()
    };
    let outputs = CoreOutputs {
        instruction_address: 0x1004,
        address: 0x4000_0010,
        device_select: 2,
        write_enable: true,
        write_strobe: [true, false, false, true],
        write_data: 0x48,
        ..CoreOutputs::default()
    };
    assert_eq!(
        sample(&inputs, &outputs),
        [1, 0, 1, 0x1004, 0x13, 0x4000_0010, 2, 1, 0b1001, 0x48, 0x55]
    );
}

#[test]
fn test_header_write_failure() {
    assert!(VcdWriter::new(FailingWriter).is_err());
}

#[test]
fn test_create_in_missing_directory() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        VcdWriter::create(&dir.path().join("missing").join("run.vcd")),
        Err(HarnessError::TraceOpen { .. })
    ));
}
