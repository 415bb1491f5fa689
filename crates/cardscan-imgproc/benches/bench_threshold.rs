use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cardscan_image::{Image, ImageSize};
use cardscan_imgproc::{color, threshold};

fn bench_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("Threshold");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = ImageSize {
            width: *width,
            height: *height,
        };

        let data = (0..width * height * 3)
            .map(|i| (i % 251) as u8)
            .collect::<Vec<_>>();
        let rgb = Image::<u8, 3>::new(image_size, data).unwrap();
        let mut gray = Image::<u8, 1>::from_size_val(image_size, 0).unwrap();
        let mut bin = Image::<u8, 1>::from_size_val(image_size, 0).unwrap();

        group.bench_with_input(
            BenchmarkId::new("gray_from_rgb_u8", &parameter_string),
            &rgb,
            |b, i| b.iter(|| color::gray_from_rgb_u8(black_box(i), black_box(&mut gray))),
        );

        color::gray_from_rgb_u8(&rgb, &mut gray).unwrap();

        group.bench_with_input(
            BenchmarkId::new("threshold_otsu", &parameter_string),
            &gray,
            |b, i| b.iter(|| threshold::threshold_otsu(black_box(i), black_box(&mut bin))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_threshold);
criterion_main!(benches);
