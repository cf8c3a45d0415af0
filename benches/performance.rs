use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fuel_core::efficiency::select_prior_entry;
use fuel_core::garage::{FuelEntry, Garage, GarageRepository, Vehicle};
use fuel_core::utils::persistence::{load_garage_from_file, save_garage_to_file};
use tempfile::tempdir;
use uuid::Uuid;

fn build_sample_garage(entry_count: usize) -> (Garage, Uuid) {
    let mut garage = Garage::new("Benchmark");
    let start_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let vehicle = Vehicle::new(Uuid::new_v4(), "Skoda", "Octavia", 2019, start_date);
    let vehicle_id = garage.insert_vehicle(vehicle).expect("insert vehicle");

    for idx in 0..entry_count {
        let date = start_date + Duration::days(idx as i64 * 3);
        let odometer = 10_000 + idx as u32 * 450;
        let litres = 30.0 + (idx % 15) as f64;
        let entry = FuelEntry::new(vehicle_id, date, odometer, litres, litres * 1.8, idx % 4 != 0);
        garage.insert_fuel_entry(entry).expect("insert entry");
    }
    (garage, vehicle_id)
}

fn bench_prior_lookup(c: &mut Criterion) {
    let (garage, vehicle_id) = build_sample_garage(black_box(10_000));
    let target = 10_000 + 5_000 * 450;

    c.bench_function("prior_entry_lookup_10k", |b| {
        b.iter(|| {
            let candidates = garage
                .list_capacity_fill_entries(vehicle_id, black_box(target))
                .expect("query");
            black_box(select_prior_entry(&candidates, target).map(|entry| entry.odometer_km))
        })
    });
}

fn bench_garage_io(c: &mut Criterion) {
    let (garage, _) = build_sample_garage(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("garage.json");

    c.bench_function("garage_save_10k", |b| {
        b.iter(|| {
            save_garage_to_file(&garage, &file_path).expect("save garage");
        })
    });

    save_garage_to_file(&garage, &file_path).expect("seed");

    c.bench_function("garage_load_10k", |b| {
        b.iter(|| {
            let loaded = load_garage_from_file(&file_path).expect("load garage");
            black_box(loaded);
        })
    });
}

criterion_group!(benches, bench_prior_lookup, bench_garage_io);
criterion_main!(benches);
