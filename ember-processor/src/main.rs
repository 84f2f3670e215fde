use std::process::ExitCode;
use std::time::Instant;

use ember_compactor::{
    EmdFlatModel, IndexWidth, compact, extract_triangle_soup, load_scene, write_model,
};

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("Usage: ember-processor <input file> <output file> [mesh number]");
        return ExitCode::from(1);
    }

    let infile = &args[1];
    let outfile = &args[2];
    // atoi 语义：解析不了就当 0 号 mesh
    let mesh_number: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0);

    println!("Infile: {}", infile);
    println!("Outfile: {}", outfile);
    println!("Mesh number: {}", mesh_number);

    let start_total = Instant::now();

    let extract_start = Instant::now();
    let soup = match load_scene(infile).and_then(|scene| extract_triangle_soup(&scene, mesh_number))
    {
        Ok(soup) => soup,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(2);
        }
    };
    println!(
        "Extracted {} vertex records ({} faces) in {:.2}s",
        soup.len(),
        soup.face_count(),
        extract_start.elapsed().as_secs_f32()
    );

    // Width is committed from the pre-compaction count.
    let width = IndexWidth::for_vertex_count(soup.len());
    let bounds = soup.bounding_sphere().to_array();

    let compact_start = Instant::now();
    let indexed = compact(&soup);
    let stats = indexed.stats(width);
    println!(
        "Compacted to {} unique vertices in {:.2}s",
        indexed.unique_count(),
        compact_start.elapsed().as_secs_f32()
    );
    println!(
        "Model size {} -> {} bytes, ratio = {:.2} %",
        stats.raw_size, stats.compacted_size, stats.ratio
    );

    let model = EmdFlatModel::from_indexed(indexed, width, bounds);
    if let Err(err) = write_model(&model, outfile) {
        eprintln!("{}", err);
        return ExitCode::from(3);
    }

    println!(
        "Done! Total execution time: {:.2}s",
        start_total.elapsed().as_secs_f32()
    );
    ExitCode::SUCCESS
}
