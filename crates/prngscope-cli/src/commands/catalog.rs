use prngscope_tests::Catalog;

pub fn run() {
    let catalog = Catalog::sp800_22r1a();
    println!("SP 800-22 rev1a battery ({} tests)\n", catalog.len());
    println!("  {:<4} {:<36} {:>12}", "#", "Test", "Min bits");
    println!("  {}", "-".repeat(54));
    for (i, test) in catalog.iter().enumerate() {
        println!("  {:<4} {:<36} {:>12}", i + 1, test.name(), test.min_bits());
    }
    println!("\nA test passes when its p-value is at least {}.", prngscope_tests::ALPHA);
}
