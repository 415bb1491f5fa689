use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cardscan_detect::{DetectRectanglesConfig, RectangleDetector};
use cardscan_image::{Image, ImageSize};

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("DetectRectangles");

    for (width, height) in [(320, 240), (640, 480), (1280, 960)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = ImageSize {
            width: *width,
            height: *height,
        };

        // a light card covering the central half of the frame
        let data = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                if x > width / 4 && x < 3 * width / 4 && y > height / 4 && y < 3 * height / 4 {
                    220
                } else {
                    30
                }
            })
            .collect::<Vec<u8>>();
        let gray = Image::<u8, 1>::new(image_size, data).unwrap();

        let mut detector =
            RectangleDetector::new(DetectRectanglesConfig::default(), image_size).unwrap();

        group.bench_with_input(
            BenchmarkId::new("detect", &parameter_string),
            &gray,
            |b, i| b.iter(|| detector.detect(black_box(i)).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_detect);
criterion_main!(benches);
