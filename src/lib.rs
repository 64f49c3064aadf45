#![crate_name = "obj2p"]

pub mod config;
pub mod zx81;


/*
Memory map of a converted program with a 3-byte payload and name "TEST"

System  4009    system variables (116 bytes, not loaded from 16384)
Program 407D    0 REM ...           (9 bytes, code at 4082)
        4086    1 SAVE "TEST"       (12 bytes)
        4092    2 RAND USR 16514    (18 bytes)
Display 40A4    D_FILE              (794 bytes)
        43BD    VARS (0x80 end marker)
        43BE    E_LINE
*/
