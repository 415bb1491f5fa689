use argh::FromArgs;
use std::path::PathBuf;

use cardscan::detect::DetectRectanglesConfig;
use cardscan::geometry::{map_point_to_container, Size};
use cardscan::imgproc::draw::draw_line;
use cardscan::io::{functional as F, png::write_image_png_rgb8};
use cardscan::{BorderStyle, CardScanner, OverlaySurface, RasterContainer};

#[derive(FromArgs)]
/// Detect a card in a photo and draw its bounding box over the image shown aspect-fill
struct Args {
    /// path to an input image
    #[argh(positional)]
    image_path: PathBuf,

    /// width of the view showing the image
    #[argh(option, default = "390")]
    container_width: usize,

    /// height of the view showing the image
    #[argh(option, default = "600")]
    container_height: usize,

    /// path to write the rendered view to, as PNG
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// pixels around the view where the overflowing image stays visible
    #[argh(option, default = "0")]
    margin: usize,

    /// path to a JSON file with the detector configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// smallest accepted ratio between the short and the long side
    #[argh(option)]
    min_aspect_ratio: Option<f32>,

    /// largest accepted ratio between the short and the long side
    #[argh(option)]
    max_aspect_ratio: Option<f32>,

    /// number of rectangles to keep, 0 for all
    #[argh(option)]
    max_observations: Option<usize>,

    /// also draw the outline through the detected corners
    #[argh(switch)]
    draw_corners: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    // any aspect ratio by default, a single card
    let mut config: DetectRectanglesConfig = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => DetectRectanglesConfig {
            minimum_aspect_ratio: 0.0,
            maximum_aspect_ratio: 1.0,
            maximum_observations: 1,
            ..Default::default()
        },
    };

    if let Some(v) = args.min_aspect_ratio {
        config.minimum_aspect_ratio = v;
    }
    if let Some(v) = args.max_aspect_ratio {
        config.maximum_aspect_ratio = v;
    }
    if let Some(v) = args.max_observations {
        config.maximum_observations = v;
    }
    config.validate()?;

    // read the image
    let rgb = F::read_image_any_rgb8(&args.image_path)?;
    log::info!("read {} ({})", args.image_path.display(), rgb.size());

    let container = RasterContainer::new(args.container_width, args.container_height);
    let mut scanner = CardScanner::new(container, config).with_style(BorderStyle::DETECTION);

    // detection runs on a worker thread, the result is applied here
    let result = scanner.set_image(rgb).wait();

    let observation = match &result {
        Ok(Some(obs)) => {
            log::info!("observation: {}", serde_json::to_string(obs)?);
            Some(obs.clone())
        }
        _ => None,
    };

    match scanner.handle_detection(result) {
        Some(rect) => println!("card at {rect}"),
        None => println!("no card found"),
    }

    let Some(output) = args.output else {
        return Ok(());
    };

    let image = scanner.image().ok_or("no image to render")?;
    let mut canvas = scanner.surface().render(image, args.margin)?;

    if let (true, Some(obs)) = (args.draw_corners, observation) {
        let image_size = Size::new(image.width() as f64, image.height() as f64);
        let bounds = scanner.surface().bounds();
        let offset = args.margin as f64;

        let corners = [obs.top_left, obs.top_right, obs.bottom_right, obs.bottom_left]
            .map(|p| map_point_to_container(p, image_size, bounds))
            .map(|p| ((p.x + offset).round() as i64, (p.y + offset).round() as i64));

        for i in 0..4 {
            draw_line(&mut canvas, corners[i], corners[(i + 1) % 4], [255, 0, 0], 1);
        }
    }

    write_image_png_rgb8(&output, &canvas)?;
    log::info!("wrote {}", output.display());

    Ok(())
}
