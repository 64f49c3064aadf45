// End-to-end tests for ZX81 tape image conversion

use obj2p::zx81::display_file::DISPLAY_FILE_LEN;
use obj2p::zx81::system_vars::{SystemVars, CODE_START, SYSTEM_VARS_LEN};
use obj2p::zx81::{ExecAddress, TapeError, TapeImage, TapeName, Zx81Converter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_log::test;

fn convert(payload: &[u8], name: &str, exec: u16) -> Vec<u8> {
    let name: TapeName = name.parse().expect("valid name");
    let exec = ExecAddress::try_from(exec).expect("valid exec address");
    Zx81Converter::new(exec)
        .convert(payload, &name)
        .expect("conversion should succeed")
}

#[test]
fn test_three_byte_program() {
    // LD A,0 / RET
    let image = convert(&[0x3E, 0x00, 0xC9], "TEST", 16514);
    assert_eq!(image.len(), 949);

    let vars = SystemVars::from_bytes(&image).unwrap();
    assert_eq!(vars.d_file, 16548);
    assert_eq!(vars.df_cc, 16549);
    assert_eq!(vars.vars, 17341);
    assert_eq!(vars.e_line, 17342);
    assert_eq!(vars.stkbot, 17342);
    assert_eq!(vars.stkend, 17342);
    assert_eq!(vars.ch_add, 16529);
    assert_eq!(vars.nxtlin, 16530);

    // The machine code loads at the default exec address
    let code_offset = SYSTEM_VARS_LEN + (16514 - CODE_START as usize);
    assert_eq!(&image[code_offset..code_offset + 3], &[0x3E, 0x00, 0xC9]);
}

#[test]
fn test_file_offsets_match_addresses() {
    let image = convert(&[0x00; 10], "Offsets", 16514);
    let vars = SystemVars::from_bytes(&image).unwrap();

    let to_offset = |addr: u16| SYSTEM_VARS_LEN + (addr - CODE_START) as usize;

    // NXTLIN is the line number of line 2, CH_ADD the NEWLINE before it
    assert_eq!(&image[to_offset(vars.nxtlin)..to_offset(vars.nxtlin) + 2], &[0x00, 0x02]);
    assert_eq!(image[to_offset(vars.ch_add)], 0x76);
    assert_eq!(image[to_offset(vars.d_file)], 0x76);
    assert_eq!(image[to_offset(vars.vars)], 0x80);
    assert_eq!(to_offset(vars.e_line), image.len());
}

#[test]
fn test_random_programs_round_trip() {
    let mut rng = StdRng::seed_from_u64(16514);
    for _ in 0..50 {
        let len = rng.gen_range(0..2000);
        let payload: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        let exec = rng.gen_range(16383..=32767u16);

        let bytes = convert(&payload, "Random", exec);
        assert_eq!(
            bytes.len(),
            SYSTEM_VARS_LEN + (len + 6) + (6 + 8) + 18 + DISPLAY_FILE_LEN
        );

        let image = TapeImage::parse(&bytes).unwrap();
        assert_eq!(image.payload(), payload.as_slice());
        assert_eq!(image.exec_address(), Some(exec));
        assert_eq!(image.tape_name().as_deref(), Some("RANDOM"));

        let derived = image.derived_fields();
        assert_eq!(derived.vars as usize, derived.d_file as usize + DISPLAY_FILE_LEN - 1);
    }
}

#[test]
fn test_conversion_is_idempotent() {
    let payload = [0x21, 0x00, 0x40, 0x36, 0x55, 0xC9];
    assert_eq!(
        convert(&payload, "Same", 16514),
        convert(&payload, "Same", 16514)
    );
}

#[test]
fn test_name_case_only_changes_output_file() {
    let lower: TapeName = "game".parse().unwrap();
    let upper: TapeName = "GAME".parse().unwrap();
    assert_eq!(lower.file_name(), "game.p");

    let converter = Zx81Converter::default();
    assert_eq!(
        converter.convert(&[0xC9], &lower).unwrap(),
        converter.convert(&[0xC9], &upper).unwrap()
    );
}

#[test]
fn test_oversized_program_is_rejected() {
    let name: TapeName = "BIG".parse().unwrap();
    let payload = vec![0u8; 60_000];
    let result = Zx81Converter::default().convert(&payload, &name);
    assert!(matches!(result, Err(TapeError::AddressOverflow(_))));
}

#[test]
fn test_invalid_parameters_are_rejected_before_conversion() {
    assert!(matches!(
        "16382".parse::<ExecAddress>(),
        Err(TapeError::ExecAddressOutOfRange(16382))
    ));
    assert!(matches!(
        "bad name".parse::<TapeName>(),
        Err(TapeError::InvalidTapeNameChar(' ', 3))
    ));
}
