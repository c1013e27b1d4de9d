//! Amount in words, Indian numbering system (thousand, lakh, crore).

use rust_decimal::Decimal;

use super::amounts::whole_rupees;

const ONES: [&str; 20] = [
    "", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN",
    "ELEVEN", "TWELVE", "THIRTEEN", "FOURTEEN", "FIFTEEN", "SIXTEEN", "SEVENTEEN", "EIGHTEEN",
    "NINETEEN",
];

const TENS: [&str; 10] = [
    "", "", "TWENTY", "THIRTY", "FORTY", "FIFTY", "SIXTY", "SEVENTY", "EIGHTY", "NINETY",
];

const CRORE: u128 = 10_000_000;
const LAKH: u128 = 100_000;
const THOUSAND: u128 = 1_000;

/// Convert a whole rupee amount to upper-case words.
///
/// `123456` becomes `"ONE LAKH TWENTY THREE THOUSAND FOUR HUNDRED AND FIFTY SIX"`.
/// Amounts of a hundred crore and above recurse on the crore count.
pub fn to_words(amount: u128) -> String {
    if amount == 0 {
        return "ZERO".to_string();
    }
    compose(amount)
}

/// Words for the whole-rupee part of a decimal amount.
pub fn amount_to_words(amount: Decimal) -> String {
    to_words(whole_rupees(amount))
}

/// Footer phrase: prefix, words and suffix joined by single spaces.
pub fn words_phrase(words: &str, prefix: &str, suffix: &str) -> String {
    [prefix.trim(), words, suffix.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn compose(n: u128) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    if n < 100 {
        let tens = TENS[(n / 10) as usize];
        return match n % 10 {
            0 => tens.to_string(),
            rest => format!("{} {}", tens, ONES[rest as usize]),
        };
    }
    if n < THOUSAND {
        return join_group(compose(n / 100), "HUNDRED", n % 100, " AND ");
    }
    if n < LAKH {
        return join_group(compose(n / THOUSAND), "THOUSAND", n % THOUSAND, " ");
    }
    if n < CRORE {
        return join_group(compose(n / LAKH), "LAKH", n % LAKH, " ");
    }
    join_group(compose(n / CRORE), "CRORE", n % CRORE, " ")
}

fn join_group(head: String, unit: &str, rest: u128, separator: &str) -> String {
    if rest == 0 {
        format!("{} {}", head, unit)
    } else {
        format!("{} {}{}{}", head, unit, separator, compose(rest))
    }
}
