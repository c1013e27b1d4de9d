//! GST state and union territory codes.

use crate::models::party::StateCode;

/// Official GST state codes with their canonical names.
pub const STATES: [(u8, &str); 39] = [
    (1, "Jammu and Kashmir"),
    (2, "Himachal Pradesh"),
    (3, "Punjab"),
    (4, "Chandigarh"),
    (5, "Uttarakhand"),
    (6, "Haryana"),
    (7, "Delhi"),
    (8, "Rajasthan"),
    (9, "Uttar Pradesh"),
    (10, "Bihar"),
    (11, "Sikkim"),
    (12, "Arunachal Pradesh"),
    (13, "Nagaland"),
    (14, "Manipur"),
    (15, "Mizoram"),
    (16, "Tripura"),
    (17, "Meghalaya"),
    (18, "Assam"),
    (19, "West Bengal"),
    (20, "Jharkhand"),
    (21, "Odisha"),
    (22, "Chhattisgarh"),
    (23, "Madhya Pradesh"),
    (24, "Gujarat"),
    (25, "Daman and Diu"),
    (26, "Dadra and Nagar Haveli and Daman and Diu"),
    (27, "Maharashtra"),
    (28, "Andhra Pradesh (Old)"),
    (29, "Karnataka"),
    (30, "Goa"),
    (31, "Lakshadweep"),
    (32, "Kerala"),
    (33, "Tamil Nadu"),
    (34, "Puducherry"),
    (35, "Andaman and Nicobar Islands"),
    (36, "Telangana"),
    (37, "Andhra Pradesh"),
    (38, "Ladakh"),
    (97, "Other Territory"),
];

/// Alternative spellings seen in free-text state fields.
const ALIASES: [(&str, u8); 14] = [
    ("jandk", 1),
    ("jammuandkashmir", 1),
    ("jammukashmir", 1),
    ("uttaranchal", 5),
    ("newdelhi", 7),
    ("nctofdelhi", 7),
    ("nationalcapitalterritoryofdelhi", 7),
    ("orissa", 21),
    ("chattisgarh", 22),
    ("dadraandnagarhaveli", 26),
    ("dnhdd", 26),
    ("pondicherry", 34),
    ("andamanandnicobar", 35),
    ("andamannicobarislands", 35),
];

/// Look up the state code for a free-text state name.
///
/// Matching ignores case, spaces and punctuation and treats `&` as "and".
/// A bare numeric code ("27") is accepted as well.
pub fn state_code_for_name(name: &str) -> Option<StateCode> {
    if let Some(code) = StateCode::parse(name) {
        return Some(code);
    }

    let key = state_key(name);
    if key.is_empty() {
        return None;
    }

    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, code)| *code)
        .or_else(|| {
            STATES
                .iter()
                .find(|(_, canonical)| state_key(canonical) == key)
                .map(|(code, _)| *code)
        })
        .and_then(StateCode::new)
}

/// Canonical name for a state code.
pub fn state_name_for_code(code: StateCode) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(c, _)| *c == code.value())
        .map(|(_, name)| *name)
}

fn state_key(name: &str) -> String {
    name.to_lowercase()
        .replace('&', "and")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
