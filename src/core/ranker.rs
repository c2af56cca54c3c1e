use crate::core::evaluator::EvaluatedListing;
use crate::core::objective::Objective;
use crate::core::pareto::{front_of, DominanceRule};

/// 逐層剝除 Pareto 前緣，回傳每一層的索引（第 0 層最好）。
///
/// 每一層都非空，所有層合起來恰好是輸入的每個索引各一次。
pub fn tier_indices(rule: DominanceRule, points: &[Vec<f64>]) -> Vec<Vec<usize>> {
    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut tiers = Vec::new();

    while !remaining.is_empty() {
        let front = front_of(rule, points, &remaining);
        if front.is_empty() {
            // 支配關係出現循環時，剩下的全部歸為最後一層
            tracing::warn!("⚠️ No undominated listing among {} remaining; closing tiers", remaining.len());
            tiers.push(std::mem::take(&mut remaining));
            break;
        }
        // front 為 remaining 的子序列，依序移除即可
        let mut in_front = front.iter().peekable();
        remaining.retain(|idx| {
            if in_front.peek() == Some(&idx) {
                in_front.next();
                false
            } else {
                true
            }
        });
        tiers.push(front);
    }

    tiers
}

/// 將已評分物件分成依序排列的層
pub fn rank_tiers(rule: DominanceRule, evaluated: Vec<EvaluatedListing>) -> Vec<Vec<EvaluatedListing>> {
    tracing::info!("📈 Ranking {} listings into Pareto tiers", evaluated.len());

    let points: Vec<Vec<f64>> = evaluated.iter().map(|e| e.score_vector()).collect();
    let tiers = tier_indices(rule, &points);

    let mut slots: Vec<Option<EvaluatedListing>> = evaluated.into_iter().map(Some).collect();
    let ranked: Vec<Vec<EvaluatedListing>> = tiers
        .into_iter()
        .map(|tier| tier.into_iter().filter_map(|idx| slots[idx].take()).collect())
        .collect();

    tracing::info!(
        "📈 Filtered down to {} Pareto tiers ({} listings on the first)",
        ranked.len(),
        ranked.first().map(Vec::len).unwrap_or(0)
    );

    ranked
}

/// 排名結果與產生它的目標列表，交給輸出端唯讀使用
#[derive(Debug, Clone)]
pub struct RankedListings {
    objectives: Vec<Objective>,
    tiers: Vec<Vec<EvaluatedListing>>,
}

impl RankedListings {
    pub fn new(objectives: Vec<Objective>, tiers: Vec<Vec<EvaluatedListing>>) -> Self {
        Self { objectives, tiers }
    }

    pub fn rank(objectives: &[Objective], rule: DominanceRule, evaluated: Vec<EvaluatedListing>) -> Self {
        Self::new(objectives.to_vec(), rank_tiers(rule, evaluated))
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn tiers(&self) -> &[Vec<EvaluatedListing>] {
        &self.tiers
    }

    /// 第 0 層，也就是整體的 Pareto 前緣
    pub fn best(&self) -> &[EvaluatedListing] {
        self.tiers.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// 依層序走訪 (層號, 物件)
    pub fn iter(&self) -> impl Iterator<Item = (usize, &EvaluatedListing)> {
        self.tiers
            .iter()
            .enumerate()
            .flat_map(|(tier, members)| members.iter().map(move |e| (tier, e)))
    }

    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
