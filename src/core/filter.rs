use crate::core::evaluator::EvaluatedListing;

/// 所有目標都有分數
pub fn is_valid(evaluated: &EvaluatedListing) -> bool {
    evaluated.is_valid()
}

/// 所有目標的分數都低於其上限
pub fn satisfies_constraints(evaluated: &EvaluatedListing) -> bool {
    evaluated.satisfies_constraints()
}

/// 篩選結果與被剔除的數量
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub kept: Vec<EvaluatedListing>,
    pub invalid: usize,
    pub over_limit: usize,
}

/// 移除無效或超過上限的物件，保留原本順序
pub fn apply(evaluated: Vec<EvaluatedListing>) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for e in evaluated {
        if !is_valid(&e) {
            outcome.invalid += 1;
        } else if !satisfies_constraints(&e) {
            outcome.over_limit += 1;
        } else {
            outcome.kept.push(e);
        }
    }

    tracing::info!(
        "✅ {} listings satisfy the constraints ({} invalid, {} over limit)",
        outcome.kept.len(),
        outcome.invalid,
        outcome.over_limit
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::evaluator::ObjectiveScore;
    use crate::core::objective::Constraint;
    use crate::domain::model::{Listing, Location, Score};

    fn evaluated(id: &str, commute: Option<f64>) -> EvaluatedListing {
        let listing = Listing {
            id: id.to_string(),
            location: Location::new(0.0, 0.0),
            price: 1000,
            url: String::new(),
            print_url: String::new(),
            address: id.to_string(),
            description: String::new(),
            image: String::new(),
        };
        EvaluatedListing::new(
            listing,
            vec![ObjectiveScore {
                objective: "Commute".to_string(),
                score: commute.map(|v| Score::new(v, format!("{} min", v))),
            }],
            vec![("Commute".to_string(), Constraint::new(Some(30.0)))],
        )
    }

    #[test]
    fn test_apply_counts_rejections() {
        let outcome = apply(vec![
            evaluated("ok", Some(29.0)),
            evaluated("slow", Some(31.0)),
            evaluated("unreachable", None),
            evaluated("edge", Some(30.0)),
        ]);

        let kept: Vec<&str> = outcome.kept.iter().map(|e| e.listing().id.as_str()).collect();
        assert_eq!(kept, vec!["ok"]);
        assert_eq!(outcome.invalid, 1);
        assert_eq!(outcome.over_limit, 2);
    }
}
