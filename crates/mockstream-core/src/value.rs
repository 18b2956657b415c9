//! 합성 값 모델.
//!
//! 생성기가 만들어내는 재귀적 구조 값과 JSON 직렬화를 정의합니다.
//! 메시지 봉투나 스키마 버전 없이 값 자체가 그대로 JSON으로 나갑니다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StreamResult;
use crate::record::UserRecord;

/// 생성기 한 번의 호출로 만들어지는 합성 값.
///
/// 구조적 동등성 외의 식별자는 없으며, 생성 후에는 변경되지 않습니다.
///
/// 역직렬화는 변형 선언 순서대로 시도하므로 `Records`가 `List`보다 앞에 있어야
/// 사용자 레코드 목록이 일반 객체 목록으로 해석되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SyntheticValue {
    /// null
    Null,
    /// 불리언
    Boolean(bool),
    /// 범위가 제한된 정수
    Integer(i64),
    /// `[0, 1)` 범위의 실수
    Float(f64),
    /// 고정 어휘에서 뽑은 문자열
    Text(String),
    /// 사용자 레코드 목록
    Records(Vec<UserRecord>),
    /// 중복 제거된 스칼라 목록
    List(Vec<SyntheticValue>),
    /// 생성된 키 → 값 매핑
    Object(BTreeMap<String, SyntheticValue>),
}

impl SyntheticValue {
    /// JSON 문자열로 직렬화.
    pub fn to_json(&self) -> StreamResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 들여쓰기된 JSON 문자열로 직렬화.
    pub fn to_json_pretty(&self) -> StreamResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// JSON 문자열에서 파싱.
    pub fn from_json(json: &str) -> StreamResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 로그와 메트릭 라벨에 쓰이는 변형 이름.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Records(_) => "records",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    /// `Object` 변형인지 확인합니다.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// 중첩된 `Object` 단계 수.
    ///
    /// 리프 값은 0, 리프만 담은 객체는 1입니다.
    pub fn object_depth(&self) -> usize {
        match self {
            Self::Object(map) => 1 + map.values().map(Self::object_depth).max().unwrap_or(0),
            _ => 0,
        }
    }
}
