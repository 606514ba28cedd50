use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenex_core::TrialSpec;
use scenex_experiment::{build_stimuli, load_stimuli_file, SceneCatalog, SessionConfig, StimulusPlan};
use scenex_render::RenderConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "scenex",
    version,
    about = "Runs scene-choice trials: one image, one prompt, one click"
)]
pub struct Args {
    /// Ready-made trial list of the form {"stimuli": [...]}
    #[arg(long, conflicts_with = "scenes")]
    pub stimuli: Option<PathBuf>,

    /// Frame metadata root; part 1 (confirm) is read from <dir>/1, part 2 (count) from <dir>/2
    #[arg(long, required_unless_present = "stimuli")]
    pub scenes: Option<PathBuf>,

    /// Scene name whose frames are sampled from --scenes
    #[arg(long, default_value = "mancar")]
    pub scene: String,

    /// Seed for frame sampling and trial order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory the /renders/ image paths resolve against
    #[arg(long, default_value = "renders")]
    pub renders: PathBuf,

    /// TrueType font for prompts and buttons
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Where the response records are written
    #[arg(long, default_value = "scene_choice_results.json")]
    pub results: PathBuf,

    /// Blank interval between trials, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub iti_ms: u64,

    /// Run in a window instead of borderless fullscreen
    #[arg(long)]
    pub windowed: bool,
}

impl Args {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            inter_trial_interval_ms: self.iti_ms,
            results_path: self.results.clone(),
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig {
            asset_root: self.renders.clone(),
            ..RenderConfig::default()
        };
        if let Some(font) = &self.font {
            config.font_path = font.clone();
        }
        config
    }

    pub fn load_trials(&self) -> Result<Vec<TrialSpec>> {
        if let Some(path) = &self.stimuli {
            return load_stimuli_file(path)
                .with_context(|| format!("loading stimuli from {}", path.display()));
        }

        let dir = self
            .scenes
            .as_ref()
            .context("either --stimuli or --scenes is required")?;
        let plan = StimulusPlan::two_part(
            SceneCatalog::load(&dir.join("1"), &self.scene).context("loading part 1 frames")?,
            SceneCatalog::load(&dir.join("2"), &self.scene).context("loading part 2 frames")?,
        );
        let trials = match self.seed {
            Some(seed) => build_stimuli(&plan, &mut StdRng::seed_from_u64(seed)),
            None => build_stimuli(&plan, &mut rand::rng()),
        }
        .context("building trial list")?;
        Ok(trials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stimuli_file_and_defaults() {
        let args = Args::try_parse_from(["scenex", "--stimuli", "trials.json"]).unwrap();
        assert_eq!(args.stimuli, Some(PathBuf::from("trials.json")));
        assert_eq!(args.scene, "mancar");

        let session = args.session_config();
        assert_eq!(session.inter_trial_interval_ms, 1000);
        assert_eq!(session.results_path, PathBuf::from("scene_choice_results.json"));

        let render = args.render_config();
        assert_eq!(render.asset_root, PathBuf::from("renders"));
        assert_eq!(render.font_path, RenderConfig::default().font_path);
    }

    #[test]
    fn a_trial_source_is_required() {
        assert!(Args::try_parse_from(["scenex"]).is_err());
        assert!(
            Args::try_parse_from(["scenex", "--stimuli", "a.json", "--scenes", "out"]).is_err()
        );
    }

    #[test]
    fn overrides_reach_the_configs() {
        let args = Args::try_parse_from([
            "scenex",
            "--scenes",
            "out",
            "--seed",
            "3",
            "--iti-ms",
            "250",
            "--font",
            "fonts/Sans.ttf",
            "--renders",
            "out/renders",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(3));
        assert_eq!(args.session_config().inter_trial_interval_ms, 250);
        assert_eq!(args.render_config().font_path, PathBuf::from("fonts/Sans.ttf"));
        assert_eq!(args.render_config().asset_root, PathBuf::from("out/renders"));
    }
}
