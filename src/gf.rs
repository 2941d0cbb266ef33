use once_cell::sync::Lazy;

/// Irreducible polynomial x^8 + x^4 + x^3 + x^2 + 1, the field of systematic Reed-Solomon codes.
pub const POLYNOMIAL: u16 = 0x11D;

struct Tables {
    log: [u8; 256],
    // doubled so that log(a) + log(b) never needs a modulo
    exp: [u8; 510],
}

static TABLES: Lazy<Tables> = Lazy::new(|| {
    let mut log = [0u8; 256];
    let mut exp = [0u8; 510];

    let mut val: u16 = 1;
    for i in 0..255 {
        exp[i] = val as u8;
        exp[i + 255] = val as u8;
        log[val as usize] = i as u8;
        val <<= 1;
        if val & 0x100 != 0 {
            val ^= POLYNOMIAL;
        }
    }

    Tables { log, exp }
});

/// add is field addition, which in characteristic 2 is XOR.
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// mul multiplies two field elements using the log/exp tables.
#[inline]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = &*TABLES;
    t.exp[t.log[a as usize] as usize + t.log[b as usize] as usize]
}

/// inv returns the multiplicative inverse of a, or None for zero.
pub fn inv(a: u8) -> Option<u8> {
    if a == 0 {
        return None;
    }
    let t = &*TABLES;
    Some(t.exp[255 - t.log[a as usize] as usize])
}
