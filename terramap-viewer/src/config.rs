//! The configuration of the viewer, given from environment variables and lazy
//! initialized when needed, and from command line arguments.

use std::num::{ParseFloatError, ParseIntError};
use std::thread;
use std::env;

use glam::DVec2;
use once_cell::race::OnceBool;
use once_cell::sync::OnceCell;


/// Return true if the whole world should be generated before displaying the view.
///
/// To disable this, set `TERRAMAP_PRELOAD=0`.
pub fn preload() -> bool {
    static ENV: OnceBool = OnceBool::new();
    ENV.get_or_init(|| {
        env::var_os("TERRAMAP_PRELOAD")
            .map(|s| s.as_encoded_bytes() != b"0")
            .unwrap_or(true)
    })
}

/// Return the number of terrain workers used to preload the world, 0 to preload on the
/// main thread. Defaults to the available parallelism.
///
/// To change it, set `TERRAMAP_WORKERS=<count>`.
pub fn workers() -> Result<usize, ConfigError> {
    static ENV: OnceCell<usize> = OnceCell::new();
    ENV.get_or_try_init(|| {
        match env::var("TERRAMAP_WORKERS") {
            Ok(value) => value.trim().parse()
                .map_err(|err| ConfigError::Workers { value, err }),
            Err(env::VarError::NotPresent) => 
                Ok(thread::available_parallelism().map(|n| n.get()).unwrap_or(1)),
            Err(env::VarError::NotUnicode(_)) => 
                Err(ConfigError::NotUnicode("TERRAMAP_WORKERS")),
        }
    }).copied()
}


/// The view to display, parsed from command line arguments:
/// `[camera_x camera_y [zoom [viewport_width viewport_height]]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewArgs {
    /// Camera position, defaults to the world center.
    pub camera: Option<DVec2>,
    pub zoom: f64,
    pub viewport: DVec2,
}

impl Default for ViewArgs {
    fn default() -> Self {
        Self {
            camera: None,
            zoom: 0.05,
            viewport: DVec2::new(1920.0, 1080.0),
        }
    }
}

impl ViewArgs {

    /// Parse the arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {

        let values = args.into_iter()
            .enumerate()
            .map(|(index, arg)| {
                let arg = arg.as_ref();
                arg.parse::<f64>().map_err(|err| ConfigError::Argument { index, value: arg.to_string(), err })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut view = Self::default();

        match values[..] {
            [] => {}
            [x, y] => {
                view.camera = Some(DVec2::new(x, y));
            }
            [x, y, zoom] => {
                view.camera = Some(DVec2::new(x, y));
                view.zoom = zoom;
            }
            [x, y, zoom, width, height] => {
                view.camera = Some(DVec2::new(x, y));
                view.zoom = zoom;
                view.viewport = DVec2::new(width, height);
            }
            _ => return Err(ConfigError::ArgumentCount(values.len())),
        }

        Ok(view)

    }

}


/// Error type returned when the configuration is invalid.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid TERRAMAP_WORKERS value {value:?}: {err}")]
    Workers { value: String, err: ParseIntError },
    #[error("environment variable {0} is not valid unicode")]
    NotUnicode(&'static str),
    #[error("argument #{index} {value:?} is not a number: {err}")]
    Argument { index: usize, value: String, err: ParseFloatError },
    #[error("expected 0, 2, 3 or 5 arguments, got {0}")]
    ArgumentCount(usize),
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn parse_args() {

        assert_eq!(ViewArgs::parse::<_, &str>([]).unwrap(), ViewArgs::default());

        let view = ViewArgs::parse(["100", "-50.5"]).unwrap();
        assert_eq!(view.camera, Some(DVec2::new(100.0, -50.5)));
        assert_eq!(view.zoom, ViewArgs::default().zoom);

        let view = ViewArgs::parse(["1", "2", "0.5", "800", "600"]).unwrap();
        assert_eq!(view.zoom, 0.5);
        assert_eq!(view.viewport, DVec2::new(800.0, 600.0));

        assert!(matches!(ViewArgs::parse(["1"]), Err(ConfigError::ArgumentCount(1))));
        assert!(matches!(ViewArgs::parse(["1", "x"]), Err(ConfigError::Argument { index: 1, .. })));

    }

}
