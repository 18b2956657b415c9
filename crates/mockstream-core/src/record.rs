//! 합성 사용자 레코드.
//!
//! 이름/주소/이메일 형태의 문자열을 내장 어휘에서 조합합니다.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const FIRST_NAMES: [&str; 12] = [
    "Mina", "Joon", "Alice", "Bruno", "Chloe", "Diego", "Emma", "Farid", "Grace", "Hiro", "Ines",
    "Jonas",
];

const LAST_NAMES: [&str; 10] = [
    "Park", "Kim", "Smith", "Garcia", "Martin", "Rossi", "Tanaka", "Novak", "Silva", "Moreau",
];

const STREETS: [&str; 8] = [
    "Harbor Road",
    "Maple Street",
    "Station Avenue",
    "Riverside Drive",
    "Hill Lane",
    "Market Square",
    "Garden Way",
    "Lake View",
];

const CITIES: [&str; 8] = [
    "Seoul", "Busan", "Lisbon", "Lyon", "Osaka", "Porto", "Boston", "Denver",
];

const EMAIL_DOMAINS: [&str; 4] = ["example.com", "example.org", "mail.test", "inbox.test"];

/// 합성 사용자 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserRecord {
    /// 이름 (`First Last`)
    pub name: String,
    /// 주소 (`12 Street, City`)
    pub address: String,
    /// 이름에서 파생된 이메일
    pub email: String,
}

impl UserRecord {
    /// 주어진 난수원으로 레코드 하나를 생성합니다.
    pub fn fake<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let first = pick(rng, &FIRST_NAMES);
        let last = pick(rng, &LAST_NAMES);
        let number: u16 = rng.gen_range(1..=999);
        let street = pick(rng, &STREETS);
        let city = pick(rng, &CITIES);
        let domain = pick(rng, &EMAIL_DOMAINS);
        let suffix: u8 = rng.gen_range(0..100);

        Self {
            name: format!("{first} {last}"),
            address: format!("{number} {street}, {city}"),
            email: format!(
                "{}.{}{suffix}@{domain}",
                first.to_lowercase(),
                last.to_lowercase()
            ),
        }
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, words: &[&'a str]) -> &'a str {
    words.choose(rng).copied().unwrap_or_default()
}
