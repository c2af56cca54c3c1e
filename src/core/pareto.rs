//! Pareto 支配關係。所有維度都是最小化：數值越小越好。
//!
//! A 支配 B：A 在每個維度都 ≤ B，且至少一個維度 < B。
//! 分數完全相同的點互不支配，因此會一起留在前緣上。
//!
//! 另提供 [`DominanceRule::Strict`]：只有在每個維度都嚴格較小時才算支配，
//! 得到的是弱 Pareto 前緣（在某一維度打平的點都會保留）。
//!
//! 預設為 [`DominanceRule::Pareto`]。以 (0,0)、(1,0)、(0,1)、(1,1) 為例，
//! 預設規則的前緣只有 (0,0)；`Strict` 則是 (0,0)、(1,0)、(0,1)。
//! 設定檔以 `[evaluation] dominance = "strict"` 切換。

use crate::core::evaluator::EvaluatedListing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// 左邊支配右邊
    Left,
    /// 右邊支配左邊
    Right,
    Neither,
}

pub fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "score vectors must have the same dimension");

    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// 每個維度都嚴格較小才算支配
pub fn strict_dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "score vectors must have the same dimension");

    if a.is_empty() {
        return Dominance::Neither;
    }

    if a.iter().zip(b.iter()).all(|(va, vb)| va < vb) {
        Dominance::Left
    } else if a.iter().zip(b.iter()).all(|(va, vb)| vb < va) {
        Dominance::Right
    } else {
        Dominance::Neither
    }
}

pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance_cmp(a, b) == Dominance::Left
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DominanceRule {
    /// ≤ 所有維度且 < 至少一個維度
    #[default]
    Pareto,
    /// < 所有維度
    Strict,
}

impl DominanceRule {
    pub fn compare(&self, a: &[f64], b: &[f64]) -> Dominance {
        match self {
            DominanceRule::Pareto => dominance_cmp(a, b),
            DominanceRule::Strict => strict_dominance_cmp(a, b),
        }
    }
}

/// 非支配點的索引，依輸入順序排列。
///
/// 複雜度 O(n² · d)。輸入非空時結果一定非空。
pub fn front_indices(points: &[Vec<f64>]) -> Vec<usize> {
    front_indices_with(DominanceRule::Pareto, points)
}

pub fn front_indices_with(rule: DominanceRule, points: &[Vec<f64>]) -> Vec<usize> {
    front_of(rule, points, &(0..points.len()).collect::<Vec<_>>())
}

/// 只在 `candidates` 子集合中找前緣。已被支配的點不再作為比較基準。
pub(crate) fn front_of(rule: DominanceRule, points: &[Vec<f64>], candidates: &[usize]) -> Vec<usize> {
    let mut dominated = vec![false; candidates.len()];

    for (i, &pi) in candidates.iter().enumerate() {
        if dominated[i] {
            continue;
        }
        for (j, &pj) in candidates.iter().enumerate().skip(i + 1) {
            match rule.compare(&points[pi], &points[pj]) {
                Dominance::Left => dominated[j] = true,
                Dominance::Right => {
                    dominated[i] = true;
                    break;
                }
                Dominance::Neither => {}
            }
        }
    }

    candidates
        .iter()
        .zip(dominated)
        .filter_map(|(&idx, is_dominated)| (!is_dominated).then_some(idx))
        .collect()
}

/// 一組已評分物件的 Pareto 前緣
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParetoFront {
    members: Vec<EvaluatedListing>,
}

impl ParetoFront {
    pub fn of(evaluated: &[EvaluatedListing]) -> Self {
        Self::with_rule(DominanceRule::Pareto, evaluated)
    }

    pub fn with_rule(rule: DominanceRule, evaluated: &[EvaluatedListing]) -> Self {
        let points: Vec<Vec<f64>> = evaluated.iter().map(|e| e.score_vector()).collect();
        let members = front_indices_with(rule, &points)
            .into_iter()
            .map(|idx| evaluated[idx].clone())
            .collect();
        Self { members }
    }

    pub fn members(&self) -> &[EvaluatedListing] {
        &self.members
    }

    pub fn into_members(self) -> Vec<EvaluatedListing> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, evaluated: &EvaluatedListing) -> bool {
        self.members.contains(evaluated)
    }
}
