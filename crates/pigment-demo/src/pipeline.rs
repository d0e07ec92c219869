//! The end-to-end run: load, edit, composite, write.

use std::time::Duration;

use pigment_core::analysis::{Channel, Histogram};
use pigment_core::layers::{LayerEdit, LayerSource, LayerStack};
use pigment_core::{
    ColorSample, EngineError, FilterError, ImageInfo, LayerId, SettleError, encode_png, resize,
    sample_color,
};

use crate::cli::Args;
use crate::config::DemoConfig;
use crate::image_loader::{ImageLoadError, load_image};

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub input: ImageInfo,
    pub width: u32,
    pub height: u32,
    pub display_width: u32,
    pub display_height: u32,
    pub layers: usize,
    pub filter_applied: bool,
    pub sample: Option<ColorSample>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] ImageLoadError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

pub async fn run(args: &Args, config: &DemoConfig) -> Result<RunSummary, PipelineError> {
    let (buffer, info) = load_image(&args.input)?;
    let mut stack = LayerStack::new(buffer, config.engine.clone());

    let filter_applied = match args.preset {
        Some(preset) => apply_filter(&mut stack, preset.kernel(), args.timeout_ms).await?,
        None => false,
    };

    if let Some(curve) = &args.curve {
        let edit = LayerEdit::begin(&stack, LayerId::BASE).map_err(EngineError::from)?;
        let adjusted = edit.curve(&curve.0).map_err(EngineError::from)?;
        edit.commit(&mut stack, adjusted).map_err(EngineError::from)?;
    }

    if let Some((width, height)) = args.resize {
        if let Some(base) = stack.base().shared_buffer() {
            let max = config.engine.max_dimension;
            let resized = resize(&base, width, height, args.method.into(), max)
                .map_err(EngineError::from)?;
            stack
                .replace_buffer(LayerId::BASE, resized)
                .map_err(EngineError::from)?;
        }
    }

    if let Some(rgba) = args.overlay {
        let id = stack
            .add_layer(LayerSource::Color(rgba))
            .map_err(EngineError::from)?;
        stack.set_blend_mode(id, args.blend.into()).map_err(EngineError::from)?;
        stack.set_opacity(id, args.opacity).map_err(EngineError::from)?;
    }

    let composition = stack.composite(config.global_scale);
    let image = composition.image;

    let histogram = Histogram::compute(&image);
    tracing::debug!(
        red_peak = histogram.peak(Channel::Red),
        green_peak = histogram.peak(Channel::Green),
        blue_peak = histogram.peak(Channel::Blue),
        "composite histogram"
    );

    let sample = match args.sample {
        Some((x, y)) => {
            let sample = sample_color(&image, x, y).map_err(EngineError::from)?;
            if let Ok(json) = serde_json::to_string(&sample) {
                tracing::info!(%json, "sampled color");
            }
            Some(sample)
        }
        None => None,
    };

    let png = encode_png(&image).map_err(EngineError::from)?;
    std::fs::write(&args.output, png).map_err(|source| PipelineError::Write {
        path: args.output.display().to_string(),
        source,
    })?;

    Ok(RunSummary {
        input: info,
        width: image.width(),
        height: image.height(),
        display_width: composition.display_size.width,
        display_height: composition.display_size.height,
        layers: stack.len(),
        filter_applied,
        sample,
    })
}

/// Filter the base layer on the worker inside an edit transaction.
///
/// Returns `false` when the job was cancelled by the timeout; the base layer
/// then keeps its original pixels.
async fn apply_filter(
    stack: &mut LayerStack,
    kernel: pigment_core::Kernel,
    timeout_ms: Option<u64>,
) -> Result<bool, PipelineError> {
    let edit = LayerEdit::begin(stack, LayerId::BASE).map_err(EngineError::from)?;
    let job = edit.spawn_convolution(kernel).map_err(EngineError::from)?;
    let cancel = job.cancel_handle();

    let outcome = match timeout_ms {
        Some(ms) => match tokio::time::timeout(Duration::from_millis(ms), job.finish()).await {
            Ok(outcome) => outcome,
            Err(_) => {
                cancel.cancel();
                Err(FilterError::Cancelled)
            }
        },
        None => job.finish().await,
    };

    match edit.settle(stack, outcome) {
        Ok(()) => Ok(true),
        Err(SettleError::Filter(FilterError::Cancelled)) => {
            tracing::warn!("filter timed out, keeping the original image");
            Ok(false)
        }
        Err(err) => Err(EngineError::from(err).into()),
    }
}
