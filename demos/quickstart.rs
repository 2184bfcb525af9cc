use eotime::{analyze_year, compute, JulianDay, SolarPosition};

fn main() {
    let today = compute(1, 2024).expect("1 January exists");
    println!("EoT on 2024-01-01: {today}");

    let pos = SolarPosition::at(JulianDay::J2000);
    println!("J2000 right ascension: {}", pos.right_ascension);

    let (_, features) = analyze_year(2024).expect("2024 is a valid year");
    for point in features.iter() {
        println!("{point}");
    }
}
