//! Benchmark A* searches and spatial index updates.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use minotaur::generation::utils::generate_maze;
use minotaur::{
    find_path, Direction, Entity, EntityKind, GenerationConfig, GeneratorAlgorithm, HashTable,
    Maze, MazeEntity, Position,
};

fn maze_for(size: usize, algorithm: GeneratorAlgorithm) -> Maze {
    let config = GenerationConfig {
        width: size,
        height: size,
        algorithm,
        ..GenerationConfig::new(1234)
    };
    generate_maze(&config).expect("benchmark maze generates")
}

fn bench_astar_corner_to_corner(c: &mut Criterion) {
    let mut group = c.benchmark_group("astar_corner_to_corner");
    for size in [21usize, 51, 101] {
        for algorithm in [GeneratorAlgorithm::Dfs, GeneratorAlgorithm::Arena] {
            let maze = maze_for(size, algorithm);
            let floors = maze.floor_positions();
            let start = floors[0];
            let goals = [*floors.last().expect("floor")];
            group.bench_with_input(
                BenchmarkId::new(algorithm.to_string(), size),
                &maze,
                |b, maze| {
                    b.iter(|| {
                        let path = find_path(start, &goals, |p| maze.is_passable(p));
                        black_box(path)
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_relocations(c: &mut Criterion) {
    let mut maze = maze_for(51, GeneratorAlgorithm::Arena);
    let mut runner = MazeEntity::new(EntityKind::Runner, Position::new(1, 1));
    maze.add_entity(&runner).expect("runner fits");

    c.bench_function("relocate_back_and_forth", |b| {
        b.iter(|| {
            let direction = if runner.position().x == 1 {
                Direction::Right
            } else {
                Direction::Left
            };
            let target = runner.position().step(direction).expect("step stays in range");
            maze.move_entity(&mut runner, target).expect("move stays inside");
        })
    });
}

fn bench_table_inserts(c: &mut Criterion) {
    c.bench_function("hash_table_insert_10k", |b| {
        b.iter(|| {
            let mut table = HashTable::new();
            for i in 0..10_000i32 {
                table.put(Position::new(i, -i), i);
            }
            black_box(table.len())
        })
    });
}

criterion_group!(
    benches,
    bench_astar_corner_to_corner,
    bench_relocations,
    bench_table_inserts
);
criterion_main!(benches);
