//! GFF3 percent escaping for column 9.

/// Characters with a reserved meaning inside the attribute column.
const RESERVED: &[char] = &[';', '=', '&', ',', '%', '\t', '\n', '\r'];

pub fn escape(value: &str) -> String {
    escape_except(value, &[])
}

///
/// Escape an attribute value. Commas separate the values of a multi-valued
/// attribute such as `Dbxref=GO:1,GO:2`, so they are written as they are.
///
pub fn escape_value(value: &str) -> String {
    escape_except(value, &[','])
}

fn escape_except(value: &str, keep: &[char]) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if !keep.contains(&c) && (RESERVED.contains(&c) || c.is_ascii_control()) {
            out.push_str(&format!("%{:02X}", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

///
/// Decode `%XX` sequences. Sequences that are not valid hex are kept as they
/// are, which is what most GFF3 producers in the wild expect.
///
pub fn unescape(value: &str) -> String {
    if !value.contains('%') {
        return value.to_string();
    }

    let bytes = value.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            out.push(hex_value(bytes[i + 1]) << 4 | hex_value(bytes[i + 2]));
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}
