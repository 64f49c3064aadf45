// Program line generation tests

#[cfg(test)]
mod tests {
    use crate::zx81::charset::{INVERSE, NEWLINE, NUMBER_MARKER, QUOTE, RAND, REM, SAVE, USR, ZERO};
    use crate::zx81::error::TapeError;
    use crate::zx81::lines::*;
    use crate::zx81::params::{ExecAddress, TapeName};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use test_log::test;

    const ALPHANUMERIC: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

    fn random_name(rng: &mut StdRng) -> String {
        let len = rng.gen_range(1..=20);
        (0..len)
            .map(|_| ALPHANUMERIC[rng.gen_range(0..ALPHANUMERIC.len())] as char)
            .collect()
    }

    #[test]
    fn test_comment_line_for_empty_payload() {
        let line = comment_line(0).unwrap();
        assert_eq!(line.len(), 6);
        assert_eq!(line.to_bytes(), vec![0x00, 0x00, 0x02, 0x00, REM, NEWLINE]);
        assert!(line.reserved().is_empty());
    }

    #[test]
    fn test_comment_line_reserves_filler() {
        let line = comment_line(3).unwrap();
        assert_eq!(line.len(), 9);
        assert_eq!(
            line.to_bytes(),
            vec![0x00, 0x00, 0x05, 0x00, REM, ZERO, ZERO, ZERO, NEWLINE]
        );
    }

    #[test]
    fn test_comment_line_length_is_little_endian() {
        let line = comment_line(300).unwrap();
        let bytes = line.to_bytes();
        assert_eq!(&bytes[2..4], &[0x2E, 0x01]); // 302
        assert_eq!(bytes.len(), 306);
    }

    #[test]
    fn test_comment_line_too_long() {
        assert!(comment_line(u16::MAX as usize - 2).is_ok());
        assert!(matches!(
            comment_line(u16::MAX as usize - 1),
            Err(TapeError::AddressOverflow(_))
        ));
    }

    #[test]
    fn test_fill_reserved_copies_payload() {
        let payload = [0x3E, 0x00, NEWLINE, 0xC9];
        let mut line = comment_line(payload.len()).unwrap();
        line.fill_reserved(&payload).unwrap();

        assert_eq!(line.reserved(), &payload);
        assert_eq!(line.content.last(), Some(&NEWLINE));

        let mut short = comment_line(2).unwrap();
        assert!(short.fill_reserved(&payload).is_err());
    }

    #[test]
    fn test_save_line_layout() {
        let name: TapeName = "Test".parse().unwrap();
        let line = save_line(&name).unwrap();

        assert_eq!(line.len(), 12);
        assert_eq!(
            line.to_bytes(),
            vec![
                0x00, 0x01, 0x08, 0x00, SAVE, QUOTE, 0x39, 0x2A, 0x38, 0x39 | INVERSE, QUOTE,
                NEWLINE
            ]
        );
    }

    #[test]
    fn test_save_line_properties_for_random_names() {
        let mut rng = StdRng::seed_from_u64(0x2081);
        for _ in 0..200 {
            let text = random_name(&mut rng);
            let name: TapeName = text.parse().unwrap();
            let content = save_line(&name).unwrap().content;
            let n = text.len();

            assert_eq!(content.len(), n + 4, "name {}", text);
            assert_eq!(content[0], SAVE);
            assert_eq!(content[1], QUOTE);
            assert_eq!(content[n + 2], QUOTE);
            assert_eq!(content[n + 3], NEWLINE);
            for (i, &byte) in content.iter().enumerate().take(n + 3).skip(1) {
                assert_eq!(byte & INVERSE != 0, i == n + 1, "name {} byte {}", text, i);
            }
        }
    }

    #[test]
    fn test_save_line_too_long() {
        // SAVE, two quotes and NEWLINE around the name
        let longest: TapeName = "A".repeat(u16::MAX as usize - 4).parse().unwrap();
        assert_eq!(save_line(&longest).unwrap().content.len(), u16::MAX as usize);

        let too_long: TapeName = "A".repeat(u16::MAX as usize - 3).parse().unwrap();
        assert!(matches!(
            save_line(&too_long),
            Err(TapeError::AddressOverflow(_))
        ));
    }

    #[test]
    fn test_exec_line_default_address() {
        let line = exec_line(ExecAddress::default());
        assert_eq!(line.len(), 18);
        assert_eq!(
            line.to_bytes(),
            vec![
                0x00, 0x02, 0x0E, 0x00, RAND, USR, 0x1D, 0x22, 0x21, 0x1D, 0x20, NUMBER_MARKER,
                0x8F, 0x01, 0x04, 0x00, 0x00, NEWLINE
            ]
        );
        assert_eq!(exec_digits(&line).as_deref(), Some("16514"));
    }

    #[test]
    fn test_exec_line_is_fixed_width() {
        for address in [16383u16, 16384, 20000, 32767] {
            let line = exec_line(ExecAddress::try_from(address).unwrap());
            assert_eq!(line.content.len(), EXEC_CONTENT_LEN);
            assert_eq!(exec_digits(&line), Some(address.to_string()));
        }
    }

    #[test]
    fn test_parse_line() {
        let line = exec_line(ExecAddress::default());
        let mut bytes = line.to_bytes();
        bytes.extend_from_slice(&[0xAA, 0xBB]);

        let (parsed, used) = ProgramLine::parse(&bytes).unwrap();
        assert_eq!(parsed, line);
        assert_eq!(used, 18);
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(matches!(
            ProgramLine::parse(&[0x00, 0x00]),
            Err(TapeError::Truncated { needed: 4, available: 2, .. })
        ));
        assert!(matches!(
            ProgramLine::parse(&[0x00, 0x00, 0x05, 0x00, REM]),
            Err(TapeError::Truncated { needed: 9, available: 5, .. })
        ));
        assert!(matches!(
            ProgramLine::parse(&[0x00, 0x00, 0x01, 0x00, REM]),
            Err(TapeError::MalformedImage(_))
        ));
    }
}
