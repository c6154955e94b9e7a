//! ONNX Runtime backed classifier

use crate::feature_extractor::{FeatureRecord, FEATURE_COUNT};
use crate::models::classifier::{label_from_class, Classifier};
use anyhow::{anyhow, Context, Result};
use ort::memory::Allocator;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Classifier exported to ONNX (e.g. a scikit-learn random forest via skl2onnx).
pub struct OnnxClassifier {
    name: String,
    /// ONNX Runtime session; `run` needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    label_output: String,
    probability_output: Option<String>,
}

impl OnnxClassifier {
    /// Load an ONNX graph and resolve its input/output names.
    pub fn load(path: &Path, onnx_threads: usize) -> Result<Self> {
        info!(path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .ok_or_else(|| anyhow!("Model {:?} declares no outputs", path))?;

        // Probability capability: present iff the graph exports a probability output
        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .map(|o| o.name.clone());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        info!(
            model = %name,
            input = %input_name,
            label_output = %label_output,
            probability_output = ?probability_output,
            "Model loaded successfully"
        );

        Ok(Self {
            name,
            session: Mutex::new(session),
            input_name,
            label_output,
            probability_output,
        })
    }

    fn input_tensor(record: &FeatureRecord) -> Result<Tensor<f32>> {
        // Shape [1, num_features]
        let shape = vec![1_i64, FEATURE_COUNT as i64];
        Tensor::from_array((shape, record.values().to_vec()))
            .context("Failed to create input tensor")
    }

    /// Run the graph once and read the label and, when asked, the probabilities
    /// from the same outputs.
    fn evaluate(
        &self,
        record: &FeatureRecord,
        with_probability: bool,
    ) -> Result<(bool, Option<[f64; 2]>)> {
        let probability_output = match (with_probability, self.probability_output.as_deref()) {
            (false, _) => None,
            (true, Some(name)) => Some(name),
            (true, None) => {
                return Err(anyhow!("{} does not expose class probabilities", self.name))
            }
        };

        let input = Self::input_tensor(record)?;
        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input])?;

        let label_value = outputs
            .get(self.label_output.as_str())
            .ok_or_else(|| anyhow!("Model output {:?} missing", self.label_output))?;
        let label = label_from_output(label_value)?;
        debug!(model = %self.name, label, "Extracted label");

        let probs = match probability_output {
            Some(name) => {
                let value = outputs
                    .get(name)
                    .ok_or_else(|| anyhow!("Model output {:?} missing", name))?;
                let probs = probabilities_from_output(value)
                    .with_context(|| format!("Unsupported probability output {:?}", name))?;
                debug!(model = %self.name, ?probs, "Extracted probabilities");
                Some(probs)
            }
            None => None,
        };

        Ok((label, probs))
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, record: &FeatureRecord) -> Result<bool> {
        self.evaluate(record, false).map(|(label, _)| label)
    }

    fn supports_probability(&self) -> bool {
        self.probability_output.is_some()
    }

    fn predict_proba(&self, record: &FeatureRecord) -> Result<[f64; 2]> {
        self.predict_with_proba(record).map(|(_, probs)| probs)
    }

    fn predict_with_proba(&self, record: &FeatureRecord) -> Result<(bool, [f64; 2])> {
        match self.evaluate(record, true)? {
            (label, Some(probs)) => Ok((label, probs)),
            (_, None) => Err(anyhow!("{} returned no class probabilities", self.name)),
        }
    }
}

/// Read the binary label from an int64 label tensor.
fn label_from_output(output: &ort::value::DynValue) -> Result<bool> {
    let (_shape, data) = output
        .try_extract_tensor::<i64>()
        .context("Label output is not an int64 tensor")?;
    let class = *data
        .first()
        .ok_or_else(|| anyhow!("Label output is empty"))?;
    label_from_class(class)
}

/// Read `[p0, p1]` from either a float tensor or a ZipMap output.
fn probabilities_from_output(output: &ort::value::DynValue) -> Result<[f64; 2]> {
    // Plain tensor output ([1, 2] float), the skl2onnx `zipmap=False` layout
    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        return probabilities_from_tensor(&dims, data);
    }

    // seq(map(int64, float)), the skl2onnx ZipMap layout
    let dtype = output.dtype();
    if DynSequenceValueType::can_downcast(&dtype) {
        return probabilities_from_sequence_map(output);
    }

    Err(anyhow!("expected a float tensor or seq(map(int64, float))"))
}

/// Read `[p0, p1]` from a `[batch, classes]` or `[classes]` tensor.
fn probabilities_from_tensor(dims: &[i64], data: &[f32]) -> Result<[f64; 2]> {
    let num_classes = match dims {
        [_, classes] | [classes] => *classes,
        _ => return Err(anyhow!("Unexpected probability tensor shape {:?}", dims)),
    };

    match num_classes {
        // Only the positive-class probability
        1 => {
            let p1 = *data.first().ok_or_else(|| anyhow!("Empty probability tensor"))? as f64;
            Ok([1.0 - p1, p1])
        }
        2 if data.len() >= 2 => Ok([data[0] as f64, data[1] as f64]),
        _ => Err(anyhow!(
            "Expected 2 class probabilities, got shape {:?}",
            dims
        )),
    }
}

/// Read `[p0, p1]` from the first map of a `seq(map(int64, float))` output.
fn probabilities_from_sequence_map(output: &ort::value::DynValue) -> Result<[f64; 2]> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow!("Failed to downcast to sequence: {}", e))?;

    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
    // Batch size is always 1
    let map_value = maps.first().ok_or_else(|| anyhow!("Empty sequence"))?;

    let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;
    probabilities_from_pairs(&kv_pairs)
}

fn probabilities_from_pairs(pairs: &[(i64, f32)]) -> Result<[f64; 2]> {
    let lookup = |class: i64| {
        pairs
            .iter()
            .find(|(id, _)| *id == class)
            .map(|(_, p)| *p as f64)
    };

    match (lookup(0), lookup(1)) {
        (Some(p0), Some(p1)) => Ok([p0, p1]),
        (None, Some(p1)) => Ok([1.0 - p1, p1]),
        (Some(p0), None) => Ok([p0, 1.0 - p0]),
        (None, None) => Err(anyhow!("No class probability found in map")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities_from_batch_tensor() {
        let probs = probabilities_from_tensor(&[1, 2], &[0.3, 0.7]).unwrap();
        assert!((probs[0] - 0.3).abs() < 1e-6);
        assert!((probs[1] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_probabilities_from_single_column() {
        let probs = probabilities_from_tensor(&[1, 1], &[0.25]).unwrap();
        assert!((probs[1] - 0.25).abs() < 1e-6);
        assert!((probs[0] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_probabilities_reject_multiclass() {
        assert!(probabilities_from_tensor(&[1, 3], &[0.2, 0.3, 0.5]).is_err());
        assert!(probabilities_from_tensor(&[1, 2, 1], &[0.2, 0.8]).is_err());
    }

    #[test]
    fn test_probabilities_from_pairs() {
        let probs = probabilities_from_pairs(&[(0, 0.1), (1, 0.9)]).unwrap();
        assert!((probs[1] - 0.9).abs() < 1e-6);

        let probs = probabilities_from_pairs(&[(1, 0.4)]).unwrap();
        assert!((probs[0] - 0.6).abs() < 1e-6);

        assert!(probabilities_from_pairs(&[(7, 1.0)]).is_err());
    }
}
