//! 생성기 출력 확인.

use std::io::Write;

use anyhow::{ensure, Result};
use mockstream_core::{Generator, INITIAL_DEPTH, MAX_DEPTH};
use tracing::debug;

/// 샘플 출력 설정.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// 출력할 값 수
    pub count: usize,
    /// 생성기 시드 (없으면 엔트로피)
    pub seed: Option<u64>,
    /// 최상위 생성 깊이
    pub depth: u32,
    /// 들여쓰기 출력 여부
    pub pretty: bool,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 1,
            seed: None,
            depth: INITIAL_DEPTH,
            pretty: false,
        }
    }
}

/// 값을 `count`개 생성해 `out`에 한 줄씩 씁니다.
///
/// 출력한 값 수를 반환합니다.
pub fn sample<W: Write>(config: &SampleConfig, out: &mut W) -> Result<usize> {
    ensure!(
        config.depth <= MAX_DEPTH + 1,
        "depth는 {} 이하여야 합니다 (입력: {})",
        MAX_DEPTH + 1,
        config.depth
    );

    let generator = match config.seed {
        Some(seed) => Generator::seeded(seed),
        None => Generator::from_entropy(),
    };
    let mut generator = generator.with_initial_depth(config.depth);

    for i in 0..config.count {
        let value = generator.payload();
        debug!(index = i, kind = value.kind(), depth = value.object_depth(), "Generated value");

        let json = if config.pretty {
            value.to_json_pretty()?
        } else {
            value.to_json()?
        };
        writeln!(out, "{json}")?;
    }

    Ok(config.count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockstream_core::SyntheticValue;

    fn run(config: &SampleConfig) -> String {
        let mut out = Vec::new();
        let written = sample(config, &mut out).unwrap();
        assert_eq!(written, config.count);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_one_document_per_line() {
        let output = run(&SampleConfig {
            count: 5,
            seed: Some(1),
            ..Default::default()
        });

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        for line in lines {
            assert!(SyntheticValue::from_json(line).unwrap().is_object());
        }
    }

    #[test]
    fn test_seed_reproduces_output() {
        let config = SampleConfig {
            count: 3,
            seed: Some(99),
            ..Default::default()
        };

        assert_eq!(run(&config), run(&config));
    }

    #[test]
    fn test_depth_past_ceiling_yields_leaves() {
        let output = run(&SampleConfig {
            count: 20,
            seed: Some(4),
            depth: MAX_DEPTH + 1,
            pretty: false,
        });

        for line in output.lines() {
            assert!(!SyntheticValue::from_json(line).unwrap().is_object());
        }
    }

    #[test]
    fn test_pretty_output_parses() {
        let output = run(&SampleConfig {
            count: 1,
            seed: Some(8),
            pretty: true,
            ..Default::default()
        });

        assert!(output.lines().count() > 1);
        assert!(SyntheticValue::from_json(&output).unwrap().is_object());
    }

    #[test]
    fn test_rejects_depth_beyond_leaf_level() {
        let config = SampleConfig {
            depth: MAX_DEPTH + 2,
            ..Default::default()
        };

        assert!(sample(&config, &mut Vec::new()).is_err());
    }
}
