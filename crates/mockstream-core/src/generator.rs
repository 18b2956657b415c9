//! 깊이 제한이 있는 재귀 합성 값 생성기.
//!
//! 각 단계에서 확률적으로 객체 형태를 바꿔 가며 중첩 객체를 만들고,
//! 깊이 예산을 넘으면 리프 값이나 크기가 제한된 목록만 생성합니다.
//! 깊이는 재귀 호출마다 값으로 전달되므로 공유 상태가 없습니다.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::record::UserRecord;
use crate::value::SyntheticValue;

/// 이 깊이를 넘으면 더 이상 `Object`를 만들지 않습니다.
pub const MAX_DEPTH: u32 = 5;

/// 최상위 생성 시작 깊이.
pub const INITIAL_DEPTH: u32 = 4;

/// 스칼라 목록 최대 길이 (중복 제거 전).
pub const MAX_LIST_LEN: usize = 10;

/// 인덱스 키 객체의 최대 키 개수.
pub const MAX_OBJECT_KEYS: usize = 5;

/// 사용자 레코드 목록 최대 길이.
pub const MAX_RECORDS: usize = 10;

/// 문자열 리프 값 어휘.
pub const WORDS: [&str; 3] = ["apple", "banana", "cherry"];

/// 단일 키 객체에 쓰이는 키.
pub const SINGLE_KEY: &str = "key";

/// 합성 값 생성기.
///
/// 난수원을 소유하므로 시드를 고정하면 같은 순서의 값을 재현할 수 있습니다.
#[derive(Debug, Clone)]
pub struct Generator<R = StdRng> {
    rng: R,
    initial_depth: u32,
}

impl Generator<StdRng> {
    /// OS 엔트로피로 초기화된 생성기.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// 고정 시드 생성기.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Default for Generator<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> Generator<R> {
    /// 주어진 난수원으로 생성기를 만듭니다.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            initial_depth: INITIAL_DEPTH,
        }
    }

    /// 최상위 생성 깊이를 바꿉니다.
    pub fn with_initial_depth(mut self, depth: u32) -> Self {
        self.initial_depth = depth;
        self
    }

    /// 설정된 최상위 깊이.
    pub fn initial_depth(&self) -> u32 {
        self.initial_depth
    }

    /// 송신 한 번에 해당하는 최상위 값.
    pub fn payload(&mut self) -> SyntheticValue {
        self.generate(self.initial_depth)
    }

    /// `depth` 단계의 값을 생성합니다.
    ///
    /// 실패하지 않으며 I/O도 없습니다. `depth > MAX_DEPTH`이면 `Object`를 반환하지 않습니다.
    pub fn generate(&mut self, depth: u32) -> SyntheticValue {
        if depth > MAX_DEPTH {
            return self.leaf();
        }

        // 2/3: key_0..key_{k-1}, 1/3: 단일 "key"
        if self.rng.gen_ratio(2, 3) {
            let count = self.rng.gen_range(1..=MAX_OBJECT_KEYS);
            let map = (0..count)
                .map(|i| (format!("key_{i}"), self.generate(depth + 1)))
                .collect::<BTreeMap<_, _>>();
            SyntheticValue::Object(map)
        } else {
            let mut map = BTreeMap::new();
            map.insert(SINGLE_KEY.to_string(), self.generate(depth + 1));
            SyntheticValue::Object(map)
        }
    }

    /// 깊이 예산을 소진한 뒤의 값: 스칼라 다섯 종류, 스칼라 목록, 레코드 목록.
    fn leaf(&mut self) -> SyntheticValue {
        match self.rng.gen_range(0..7) {
            0 => self.integer(),
            1 => self.float(),
            2 => self.word(),
            3 => SyntheticValue::Boolean(self.rng.gen_bool(0.5)),
            4 => self.scalar_list(),
            5 => SyntheticValue::Null,
            _ => self.records(),
        }
    }

    fn scalar(&mut self) -> SyntheticValue {
        match self.rng.gen_range(0..5) {
            0 => self.integer(),
            1 => self.float(),
            2 => self.word(),
            3 => SyntheticValue::Boolean(self.rng.gen_bool(0.5)),
            _ => SyntheticValue::Null,
        }
    }

    fn integer(&mut self) -> SyntheticValue {
        SyntheticValue::Integer(self.rng.gen_range(1..=100))
    }

    fn float(&mut self) -> SyntheticValue {
        SyntheticValue::Float(self.rng.gen_range(0.0..1.0))
    }

    fn word(&mut self) -> SyntheticValue {
        let word = WORDS.choose(&mut self.rng).copied().unwrap_or(WORDS[0]);
        SyntheticValue::Text(word.to_string())
    }

    /// 스칼라 1..=10개를 뽑은 뒤 처음 나온 순서를 유지하며 중복을 제거합니다.
    fn scalar_list(&mut self) -> SyntheticValue {
        let requested = self.rng.gen_range(1..=MAX_LIST_LEN);
        let mut items: Vec<SyntheticValue> = Vec::with_capacity(requested);

        for _ in 0..requested {
            let item = self.scalar();
            if !items.contains(&item) {
                items.push(item);
            }
        }

        SyntheticValue::List(items)
    }

    fn records(&mut self) -> SyntheticValue {
        let count = self.rng.gen_range(1..=MAX_RECORDS);
        let records = (0..count)
            .map(|_| UserRecord::fake(&mut self.rng))
            .collect();
        SyntheticValue::Records(records)
    }
}
