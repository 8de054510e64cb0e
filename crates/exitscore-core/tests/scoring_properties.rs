use exitscore_core::engine::{round_percent, score_category, score_overall};
use exitscore_core::model::{
    Answer, AnswerValue, AssessmentSchema, CategoryDefinition, QuestionDefinition, ResponseSet,
};
use proptest::prelude::*;

fn answer_value() -> impl Strategy<Value = AnswerValue> {
    prop_oneof![
        Just(AnswerValue::Yes),
        Just(AnswerValue::No),
        Just(AnswerValue::Unknown),
    ]
}

/// Category weights and, per category, positive question weights.
fn schema_strategy() -> impl Strategy<Value = AssessmentSchema> {
    prop::collection::vec(
        (0.0f64..1.0, prop::collection::vec(0.01f64..1.0, 1..7)),
        1..6,
    )
    .prop_map(|cats| {
        let categories = cats
            .into_iter()
            .enumerate()
            .map(|(i, (weight, questions))| {
                CategoryDefinition::new(
                    format!("Category {i}"),
                    weight,
                    questions
                        .into_iter()
                        .map(|w| QuestionDefinition::new(w, ""))
                        .collect(),
                )
            })
            .collect();
        AssessmentSchema::new(categories).unwrap()
    })
}

/// A schema plus at most one in-range answer per question.
fn scored_input() -> impl Strategy<Value = (AssessmentSchema, Vec<Answer>)> {
    schema_strategy().prop_flat_map(|schema| {
        let slots: Vec<(usize, usize)> = schema
            .categories()
            .iter()
            .enumerate()
            .flat_map(|(ci, c)| (0..c.questions.len()).map(move |qi| (ci, qi)))
            .collect();
        let count = slots.len();
        (
            Just(schema),
            prop::collection::vec(prop::option::of(answer_value()), count).prop_map(
                move |values| {
                    slots
                        .iter()
                        .zip(values)
                        .filter_map(|(&(ci, qi), v)| v.map(|v| Answer::new(ci, qi, v)))
                        .collect::<Vec<_>>()
                },
            ),
        )
    })
}

fn uniform(schema: &AssessmentSchema, value: AnswerValue) -> ResponseSet {
    schema
        .categories()
        .iter()
        .enumerate()
        .flat_map(|(ci, c)| (0..c.questions.len()).map(move |qi| Answer::new(ci, qi, value)))
        .collect()
}

proptest! {
    #[test]
    fn category_scores_stay_in_unit_interval((schema, answers) in scored_input()) {
        let card = score_overall(&schema, &ResponseSet::new(answers)).unwrap();
        for c in &card.categories {
            prop_assert!((0.0..=1.0 + 1e-12).contains(&c.score), "{} out of range", c.score);
            prop_assert!(c.answered <= c.total);
        }
    }

    #[test]
    fn overall_is_bounded_by_total_weight((schema, answers) in scored_input()) {
        let card = score_overall(&schema, &ResponseSet::new(answers)).unwrap();
        prop_assert!(card.overall.value() <= round_percent(100.0 * schema.total_weight()));
    }

    #[test]
    fn all_yes_scores_one_per_category(schema in schema_strategy()) {
        let card = score_overall(&schema, &uniform(&schema, AnswerValue::Yes)).unwrap();
        for c in &card.categories {
            prop_assert!((c.score - 1.0).abs() < 1e-9);
        }
        prop_assert_eq!(card.overall.value(), round_percent(100.0 * schema.total_weight()));
    }

    #[test]
    fn all_unknown_earns_fifteen_percent(schema in schema_strategy()) {
        let card = score_overall(&schema, &uniform(&schema, AnswerValue::Unknown)).unwrap();
        for c in &card.categories {
            prop_assert!((c.score - 0.15).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_responses_score_zero(schema in schema_strategy()) {
        let card = score_overall(&schema, &ResponseSet::default()).unwrap();
        prop_assert_eq!(card.overall.value(), 0);
    }

    #[test]
    fn answer_order_does_not_matter((schema, answers) in scored_input()) {
        let forward = score_overall(&schema, &ResponseSet::new(answers.clone())).unwrap();
        let reversed: ResponseSet = answers.into_iter().rev().collect();
        let backward = score_overall(&schema, &reversed).unwrap();
        prop_assert_eq!(forward.overall, backward.overall);
        for (a, b) in forward.categories.iter().zip(&backward.categories) {
            prop_assert!((a.score - b.score).abs() < 1e-12);
        }
    }

    #[test]
    fn category_order_does_not_matter((schema, answers) in scored_input()) {
        let last = schema.len() - 1;
        let reordered =
            AssessmentSchema::new(schema.categories().iter().rev().cloned().collect()).unwrap();
        let remapped: ResponseSet = answers
            .iter()
            .map(|a| Answer::new(last - a.category, a.question, a.answer))
            .collect();

        let forward = score_overall(&schema, &ResponseSet::new(answers)).unwrap();
        let backward = score_overall(&reordered, &remapped).unwrap();
        prop_assert_eq!(forward.overall, backward.overall);
        for (a, b) in forward.categories.iter().zip(backward.categories.iter().rev()) {
            prop_assert_eq!(&a.name, &b.name);
            prop_assert!((a.score - b.score).abs() < 1e-12);
        }
    }

    #[test]
    fn upgrading_an_answer_never_lowers_the_score(
        (schema, answers) in scored_input(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!answers.is_empty());
        let i = pick.index(answers.len());
        let mut upgraded = answers.clone();
        upgraded[i].answer = AnswerValue::Yes;

        let target = answers[i].category;
        let category = &schema.categories()[target];
        let before = score_category(target, category, &ResponseSet::new(answers)).unwrap();
        let after = score_category(target, category, &ResponseSet::new(upgraded)).unwrap();
        prop_assert!(after.score + 1e-12 >= before.score);
    }

    #[test]
    fn out_of_range_category_is_always_rejected(schema in schema_strategy(), extra in 0usize..4) {
        let responses = ResponseSet::new(vec![Answer::new(schema.len() + extra, 0, AnswerValue::Yes)]);
        prop_assert!(score_overall(&schema, &responses).is_err());
    }
}
