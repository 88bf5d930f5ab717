use crate::perturbations::{ModelPredictions, Prediction};
use fxhash::FxHashMap;
use std::fmt::{Display, Error, Formatter};

impl ModelPredictions {
    pub fn new(model_name: &str) -> ModelPredictions {
        ModelPredictions {
            model_name: model_name.to_string(),
            predictions: FxHashMap::default(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model_name.as_str()
    }

    /// Record (or overwrite) the prediction for the given combination.
    pub fn insert(&mut self, combination: &str, prediction: Prediction) {
        self.predictions.insert(combination.to_string(), prediction);
    }

    pub fn get(&self, combination: &str) -> Option<Prediction> {
        self.predictions.get(combination).cloned()
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// A tab separated row with the model name followed by the predictions for the given
    /// combinations. Combinations without a prediction are `NA`.
    pub fn to_row(&self, combinations: &[String]) -> String {
        let mut row = self.model_name.clone();
        for combination in combinations {
            let prediction = self.get(combination).unwrap_or(Prediction::NotAvailable);
            row.push('\t');
            row.push_str(&prediction.to_string());
        }
        row
    }
}

impl Display for Prediction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Prediction::Synergy => write!(f, "1"),
            Prediction::NonSynergy => write!(f, "0"),
            Prediction::NotAvailable => write!(f, "NA"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::perturbations::{ModelPredictions, Prediction};
    use pretty_assertions::assert_eq;

    #[test]
    fn prediction_rows() {
        let mut predictions = ModelPredictions::new("model_1");
        predictions.insert("[A]-[B]", Prediction::Synergy);
        predictions.insert("[A]-[C]", Prediction::NonSynergy);
        predictions.insert("[B]-[C]", Prediction::NotAvailable);
        assert_eq!(3, predictions.len());
        assert_eq!(Some(Prediction::Synergy), predictions.get("[A]-[B]"));

        let combinations: Vec<String> = ["[B]-[C]", "[A]-[B]", "[A]-[C]", "[C]-[D]"]
            .iter()
            .map(|it| it.to_string())
            .collect();
        assert_eq!("model_1\tNA\t1\t0\tNA", predictions.to_row(&combinations));

        predictions.insert("[A]-[B]", Prediction::NonSynergy);
        assert_eq!("model_1\t0", predictions.to_row(&combinations[1..2]));
    }
}
