#[cfg(test)]
mod tests {
    use std::num::NonZero;
    use std::time::Duration;

    use itertools::Itertools;
    use strum::VariantArray;

    use crate::check::{check_loop, check_no_pools, check_regions, region_sizes, LoopDefect, RegionDefect};
    use crate::genre::masyu::Pearl;
    use crate::genre::nurikabe::{IslandClue, SHADED};
    use crate::genre::simpleloop::Shaded;
    use crate::genre::{masyu, nurikabe, simpleloop, Clues, Context, DecodeError, Genre, Givens};
    use crate::grid::SymbolGrid;
    use crate::lattice::Lattice;
    use crate::location::Point;
    use crate::loops::{LoopConstrainer, LoopSegment, EMPTY};
    use crate::shape::Direction;
    use crate::solver::{SatSolver, SolveOutcome, Term};
    use crate::source::{FileDataSource, Payload, PuzzleData, UrlSource};
    use crate::symbol::SymbolSet;
    use crate::{Puzzle, PuzzleBuilder, PuzzleError, Solution, SolveOptions, Uniqueness, Verdict};

    const TIMEOUT: Duration = Duration::from_secs(120);

    fn from_url(url: &str) -> Puzzle {
        Puzzle::fetch(&mut UrlSource, url).unwrap()
    }

    fn solve(puzzle: &mut Puzzle) -> Solution {
        match puzzle.solve(TIMEOUT).unwrap() {
            Verdict::Solved(solution) => solution,
            other => panic!("expected a solution, got {:?}", other),
        }
    }

    fn lattice(width: usize, height: usize) -> Lattice {
        Lattice::with_dims((NonZero::new(width).unwrap(), NonZero::new(height).unwrap()))
    }

    #[test]
    fn parse_url() {
        let data = PuzzleData::from_url("https://puzz.link/p?masyu/5/5/109032090").unwrap();
        assert_eq!(data, PuzzleData::new("masyu", 5, 5, Payload::Url("109032090".to_owned())));

        let data = PuzzleData::from_url("http://pzv.jp/p.html?nurikabe/4/5/2p4h.k").unwrap();
        assert_eq!((data.genre.as_str(), data.width, data.height), ("nurikabe", 4, 5));

        assert!(matches!(PuzzleData::from_url("masyu/5"), Err(DecodeError::MalformedUrl(_))));
        assert!(matches!(PuzzleData::from_url("https://puzz.link/p?masyu/x/5/1"), Err(DecodeError::MalformedUrl(_))));
    }

    #[test]
    fn parse_file_data() {
        let data = PuzzleData::from_file_data("pzprv3\nmasyu\n2\n3\n. 1 .\n2 . .\n").unwrap();
        assert_eq!((data.width, data.height), (3, 2));

        let givens = Genre::Masyu.decode(&data).unwrap();
        assert_eq!(givens, Givens::Masyu(Clues::from_iter([(Point(0, 1), Pearl::White), (Point(1, 0), Pearl::Black)])));

        assert!(matches!(PuzzleData::from_file_data("pzprv2\nmasyu\n2\n3\n"), Err(DecodeError::MalformedFileData(_))));
        assert!(matches!(PuzzleData::from_file_data("pzprv3\nmasyu"), Err(DecodeError::MalformedFileData(_))));
    }

    #[test]
    fn genre_registry() {
        assert_eq!(Genre::from_alias("masyu"), Some(Genre::Masyu));
        assert_eq!(Genre::from_alias("mashu"), Some(Genre::Masyu));
        assert_eq!(Genre::from_alias("simpleloop"), Some(Genre::SimpleLoop));
        assert_eq!(Genre::from_alias("nurikabe"), Some(Genre::Nurikabe));
        assert_eq!(Genre::from_alias("sudoku"), None);
        assert!(Genre::Masyu.uses_loop() && Genre::SimpleLoop.uses_loop() && !Genre::Nurikabe.uses_loop());
    }

    #[test]
    fn decode_masyu() {
        let clues = masyu::decode("masyu", 5, 5, "109032090").unwrap();
        assert_eq!(clues, Clues::from_iter([
            (Point(0, 2), Pearl::White),
            (Point(1, 1), Pearl::White),
            (Point(2, 3), Pearl::White),
            (Point(3, 2), Pearl::Black),
            (Point(4, 1), Pearl::White),
        ]));
        assert_eq!(masyu::encode(5, 5, &clues), "109032090");

        // a short payload leaves the rest empty
        assert_eq!(masyu::decode("mashu", 5, 5, "1").unwrap(), Clues::from_iter([(Point(0, 2), Pearl::White)]));
        assert_eq!(masyu::decode("masyu", 5, 5, "10!").unwrap_err(), DecodeError::InvalidDigit { ch: '!', radix: 27 });
        assert!(matches!(masyu::decode("nurikabe", 5, 5, "109032090"), Err(DecodeError::GenreMismatch { .. })));
    }

    #[test]
    fn decode_simpleloop() {
        let clues = simpleloop::decode("simpleloop", 12, 12, "02000984b880g110o2g0g2id000gg").unwrap();
        assert!(clues.contains(Point(0, 8)));
        assert!(!clues.contains(Point(0, 7)));
        assert_eq!(simpleloop::encode(12, 12, &clues), "02000984b880g110o2g0g2id000gg");

        assert!(simpleloop::decode("simpleloop", 3, 2, "00").unwrap().is_empty());
        // bits past the last cell are dropped
        assert_eq!(simpleloop::decode("simpleloop", 2, 1, "v").unwrap().len(), 2);
        assert!(matches!(simpleloop::decode("masyu", 3, 2, "00"), Err(DecodeError::GenreMismatch { .. })));
    }

    #[test]
    fn decode_nurikabe() {
        let clues = nurikabe::decode("nurikabe", 4, 5, "2p4h.k").unwrap();
        assert_eq!(clues, Clues::from_iter([
            (Point(0, 0), IslandClue::Size(2)),
            (Point(2, 3), IslandClue::Size(4)),
            (Point(3, 2), IslandClue::Unknown),
        ]));
        assert_eq!(nurikabe::encode(4, 5, &clues).unwrap(), "2p4h.k");

        let clues = nurikabe::decode("nurikabe", 4, 1, "-1a+100=001%002").unwrap();
        assert_eq!(clues.iter().map(|(_, clue)| *clue).collect_vec(), vec![
            IslandClue::Size(26),
            IslandClue::Size(256),
            IslandClue::Size(4097),
            IslandClue::Size(8194),
        ]);
        assert_eq!(nurikabe::encode(4, 1, &clues).unwrap(), "-1a+100=001%002");

        // runs longer than 20 cells take several letters
        let clues = nurikabe::decode("nurikabe", 26, 1, "zk1").unwrap();
        assert_eq!(clues, Clues::from_iter([(Point(0, 25), IslandClue::Size(1))]));
        assert_eq!(nurikabe::encode(26, 1, &clues).unwrap(), "zk1");

        // characters outside the alphabet are skipped without taking a cell
        let clues = nurikabe::decode("nurikabe", 3, 1, "2G3").unwrap();
        assert_eq!(clues.get(Point(0, 1)), Some(&IslandClue::Size(3)));

        assert_eq!(
            nurikabe::decode("nurikabe", 4, 4, "-1").unwrap_err(),
            DecodeError::TruncatedEscape { escape: '-', offset: 0 },
        );
        assert_eq!(nurikabe::decode("nurikabe", 4, 4, "+zz0").unwrap_err(), DecodeError::InvalidDigit { ch: 'z', radix: 16 });
        assert_eq!(nurikabe::encode(1, 1, &Clues::from_iter([(Point(0, 0), IslandClue::Size(12288))])), None);
    }

    #[test]
    fn decode_rows() {
        let rows = ["* . .", ". * ."].map(str::to_owned);
        assert_eq!(
            simpleloop::decode_rows("simpleloop", 3, 2, &rows).unwrap(),
            Clues::from_iter([(Point(0, 0), Shaded), (Point(1, 1), Shaded)]),
        );

        let rows = ["2 . ?", ". . 10"].map(str::to_owned);
        assert_eq!(
            nurikabe::decode_rows("nurikabe", 3, 2, &rows).unwrap(),
            Clues::from_iter([
                (Point(0, 0), IslandClue::Size(2)),
                (Point(0, 2), IslandClue::Unknown),
                (Point(1, 2), IslandClue::Size(10)),
            ]),
        );

        assert_eq!(
            masyu::decode_rows("masyu", 3, 3, &rows).unwrap_err(),
            DecodeError::MalformedRows { expected: 3, found: 2 },
        );
        assert_eq!(
            masyu::decode_rows("masyu", 3, 2, &["1 3 .".to_owned(), ". . .".to_owned()]).unwrap_err(),
            DecodeError::InvalidToken("3".to_owned()),
        );
    }

    #[test]
    fn lattice_shape() {
        let lattice = lattice(4, 3);
        assert_eq!(lattice.len(), 12);
        assert!(lattice.contains(Point(2, 3)) && !lattice.contains(Point(3, 0)));
        assert_eq!(lattice.index(Point(2, 1)), 9);
        assert_eq!(lattice.point(9), Point(2, 1));
        assert_eq!(lattice.edges().count(), 3 * 3 + 2 * 4);
        assert_eq!(lattice.squares().count(), 3 * 2);
        assert_eq!(lattice.neighbors(Point(0, 0)).len(), 2);
        assert_eq!(lattice.neighbors(Point(1, 1)).len(), 4);
        assert_eq!(lattice.neighbor(Point(0, 3), Direction::East), None);
        assert_eq!(lattice.neighbor(Point(0, 3), Direction::South), Some(Point(1, 3)));
        assert_eq!(Direction::between(Point(1, 1), Point(0, 1)), Some(Direction::North));
        assert_eq!(Direction::between(Point(1, 1), Point(0, 0)), None);
    }

    #[test]
    fn symbol_merging() {
        let mut symbols = LoopSegment::symbols();
        assert_eq!(symbols.len(), 7);
        assert_eq!(symbols.subset("turns").map(<[usize]>::len), Some(4));

        symbols.merge(&nurikabe::symbols()).merge(&LoopSegment::symbols());
        assert_eq!(symbols.len(), 9);
        assert_eq!(symbols.index_of(EMPTY), Some(6));
        assert_eq!(symbols.index_of(SHADED), Some(7));
        assert_eq!(symbols.subset("loop").map(<[usize]>::len), Some(6));

        let set = SymbolSet::new([("A", "a"), ("B", "b"), ("A", "x")]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).map(|symbol| symbol.label()), Some("a"));
    }

    #[test]
    fn count_constraint_blocks_only_primary_variables() {
        let mut solver = SatSolver::new();
        let vars = (0..4).map(|i| Term::Lit(solver.alloc_bool(&format!("x{}", i)).positive())).collect_vec();
        solver.require_count(&vars, 2);
        assert_eq!(solver.name_of(varisat::Var::from_index(1)), Some("x1"));

        let mut solutions = 0;
        while solver.solve(TIMEOUT).unwrap() == SolveOutcome::Sat {
            assert_eq!(vars.iter().filter(|var| solver.model().term(**var)).count(), 2);
            solutions += 1;
            solver.block_current_model();
        }
        assert_eq!(solutions, 6);
    }

    #[test]
    fn integer_constraints() {
        let mut solver = SatSolver::new();
        let a = solver.alloc_int("a", 0, 5);
        let b = solver.alloc_int("b", -1, 5);
        solver.require_int_offset(&[], &a, &b, 2);
        solver.require_int_constant(&[], &b, 3);
        assert_eq!(solver.solve(TIMEOUT).unwrap(), SolveOutcome::Sat);
        assert_eq!(solver.model().int(&a), 5);
        assert_eq!(solver.model().int(&b), 3);

        solver.forbid_int_constant(&[], &a, 5);
        assert_eq!(solver.solve(TIMEOUT).unwrap(), SolveOutcome::Unsat);
    }

    #[test]
    fn constant_terms() {
        let mut solver = SatSolver::new();
        let x = Term::Lit(solver.alloc_bool("x").positive());
        assert_eq!(solver.define_and(&[x, Term::Const(true)]), x);
        assert_eq!(solver.define_or(&[x, Term::Const(true)]), Term::Const(true));
        assert_eq!(solver.define_or(&[]), Term::Const(false));

        solver.add_clause([Term::Const(false), x]);
        assert_eq!(solver.solve(TIMEOUT).unwrap(), SolveOutcome::Sat);
        assert!(solver.model().term(x));

        solver.require(false);
        assert_eq!(solver.solve(TIMEOUT).unwrap(), SolveOutcome::Unsat);
    }

    #[test]
    #[should_panic]
    fn model_before_solving() {
        SatSolver::new().model();
    }

    #[test]
    fn solve_masyu() {
        let mut puzzle = from_url("https://puzz.link/p?masyu/5/5/109032090");
        let solution = solve(&mut puzzle);

        assert_eq!(solution.rows(), ["┌─○┐ ", "└○┐│ ", "  │○ ", "┌─●└┐", "└○──┘"]);
        assert_eq!(check_loop(&solution), Ok(()));
        assert_eq!(check_regions(&solution), Err(RegionDefect::NoRegionData));
        assert!(matches!(puzzle.check_unique(TIMEOUT).unwrap(), Uniqueness::Unique));
    }

    #[test]
    fn solve_simpleloop() {
        let mut puzzle = from_url("https://puzz.link/p?simpleloop/12/12/02000984b880g110o2g0g2id000gg");
        let solution = solve(&mut puzzle);

        assert_eq!(format!("{}", solution), "┌─┐┌┐┌─┐▮┌─┐
└┐└┘└┘┌┘┌┘┌┘
┌┘▮┌┐▮│▮└┐└┐
│▮┌┘│▮│▮▮│▮│
└┐│▮└┐└┐┌┘┌┘
▮└┘┌┐└┐└┘▮└┐
┌┐▮│└┐└┐▮▮┌┘
│└┐│▮│▮└─┐└┐
└┐└┘▮└┐┌─┘┌┘
▮│▮┌┐▮└┘▮▮│▮
┌┘┌┘│┌┐┌─┐└┐
└─┘▮└┘└┘▮└─┘
");
        assert_eq!(check_loop(&solution), Ok(()));

        let Givens::SimpleLoop(clues) = &puzzle.layers()[0] else { panic!("expected simpleloop givens") };
        for point in solution.lattice().points() {
            assert_eq!(solution.name_at(point) == EMPTY, clues.contains(point), "at {:?}", point);
        }
    }

    #[test]
    fn solve_times_out() {
        // nine pigeons, eight holes
        let mut solver = SatSolver::new();
        let holes = (0..9)
            .map(|pigeon| (0..8).map(|hole| solver.alloc_bool(&format!("p{}h{}", pigeon, hole)).positive()).collect_vec())
            .collect_vec();
        for pigeon in &holes {
            solver.add_clause(pigeon.iter().map(|lit| Term::Lit(*lit)));
        }
        for hole in 0..8 {
            solver.require_at_most_one(&holes.iter().map(|pigeon| pigeon[hole]).collect_vec());
        }
        assert_eq!(solver.solve(Duration::ZERO).unwrap(), SolveOutcome::Unknown);
        assert_eq!(solver.stale_workers(), 1);

        let mut puzzle = from_url("https://puzz.link/p?simpleloop/12/12/02000984b880g110o2g0g2id000gg");
        assert!(matches!(puzzle.solve(Duration::ZERO).unwrap(), Verdict::TimedOut));
        solve(&mut puzzle);
        assert!(matches!(puzzle.check_unique(Duration::ZERO).unwrap(), Uniqueness::Undetermined));
    }

    #[test]
    fn simpleloop_uniqueness() {
        let mut puzzle = from_url("https://puzz.link/p?simpleloop/3/2/00");
        let report = puzzle.run(&SolveOptions { check_unique: true, ..Default::default() }).unwrap();
        let Verdict::Solved(solution) = report.verdict else { panic!("expected a solution") };
        assert_eq!(format!("{}", solution), "┌─┐\n└─┘\n");
        assert!(matches!(report.uniqueness, Some(Uniqueness::Unique)));

        let mut puzzle = from_url("https://puzz.link/p?simpleloop/4/3/000");
        solve(&mut puzzle);
        let Uniqueness::Alternate(alternate) = puzzle.check_unique(TIMEOUT).unwrap() else {
            panic!("expected an alternate solution")
        };
        assert_eq!(check_loop(&alternate), Ok(()));
    }

    #[test]
    fn solve_nurikabe_with_known_sea_size() {
        let mut puzzle = from_url("https://puzz.link/p?nurikabe/4/4/h2n3j");
        let solution = solve(&mut puzzle);

        assert_eq!(format!("{}", solution), "█ 2█
████
█  3
████
");
        assert_eq!(check_regions(&solution), Ok(()));
        assert_eq!(check_no_pools(&solution, SHADED), Ok(()));
        assert_eq!(check_loop(&solution), Err(LoopDefect::NoLoopData));
        assert_eq!(region_sizes(&solution).into_iter().map(|(_, size)| size).sorted().collect_vec(), vec![2, 3, 11]);
        assert!(matches!(puzzle.check_unique(TIMEOUT).unwrap(), Uniqueness::Unique));
    }

    #[test]
    fn solve_nurikabe_with_forced_sea_cells() {
        // the diagonal clues force the sea, the unknown clue leaves its size open
        let mut puzzle = from_url("https://puzz.link/p?nurikabe/4/5/2p4h.k");
        let solution = solve(&mut puzzle);

        assert_eq!(solution.rows(), ["2██ ", " █  ", "███4", "█ ?█", "████"]);
        assert_eq!(check_regions(&solution), Ok(()));
        assert_eq!(check_no_pools(&solution, SHADED), Ok(()));
        assert!(matches!(puzzle.check_unique(TIMEOUT).unwrap(), Uniqueness::Unique));
    }

    #[test]
    fn solve_small_nurikabe() {
        let mut puzzle = from_url("https://puzz.link/p?nurikabe/4/3/1k2g");
        assert_eq!(format!("{}", solve(&mut puzzle)), "1███
█ 2█
████
");

        let mut puzzle = from_url("https://puzz.link/p?nurikabe/4/4/g4j.o");
        let solution = solve(&mut puzzle);
        assert_eq!(format!("{}", solution), " 4██
 █?█
 █ █
████
");
        assert_eq!(check_regions(&solution), Ok(()));
        assert!(matches!(puzzle.check_unique(TIMEOUT).unwrap(), Uniqueness::Unique));
    }

    #[test]
    fn nurikabe_alternates() {
        for url in ["https://puzz.link/p?nurikabe/4/5/h3u4g", "https://puzz.link/p?nurikabe/4/4/4m.k1g"] {
            let mut puzzle = from_url(url);
            let first = solve(&mut puzzle);
            let Uniqueness::Alternate(second) = puzzle.check_unique(TIMEOUT).unwrap() else {
                panic!("expected an alternate solution for {}", url)
            };
            assert_ne!(first.rows(), second.rows());
            assert_eq!(check_regions(&second), Ok(()));
            assert_eq!(check_no_pools(&second, SHADED), Ok(()));
        }
    }

    #[test]
    fn overfull_nurikabe() {
        let mut puzzle = from_url("https://puzz.link/p?nurikabe/2/2/9");
        assert!(matches!(puzzle.solve(TIMEOUT).unwrap(), Verdict::NoSolution));
    }

    #[test]
    fn unknown_genre() {
        let result = Puzzle::fetch(&mut UrlSource, "https://puzz.link/p?sudoku/4/4/abcd");
        assert!(matches!(result, Err(PuzzleError::UnknownGenre(genre)) if genre == "sudoku"));

        let result = PuzzleBuilder::new()
            .add_layer(PuzzleData::new("masyu", 5, 5, Payload::Url("109032090".to_owned())))
            .add_layer(PuzzleData::new("yajilin", 5, 5, Payload::Url(String::new())))
            .build();
        assert!(matches!(result, Err(PuzzleError::UnknownGenre(_))));

        assert!(matches!(PuzzleBuilder::new().build(), Err(PuzzleError::NoLayers)));
    }

    #[test]
    fn layer_validation() {
        let result = PuzzleBuilder::new()
            .add_layer(PuzzleData::new("masyu", 5, 5, Payload::Url("109032090".to_owned())))
            .add_layer(PuzzleData::new("simpleloop", 4, 5, Payload::Url("0000".to_owned())))
            .build();
        assert!(matches!(result, Err(PuzzleError::DimensionMismatch { expected: (5, 5), found: (4, 5) })));

        let result = Puzzle::new(vec![PuzzleData::new("masyu", 0, 5, Payload::Url(String::new()))]);
        assert!(matches!(result, Err(PuzzleError::ZeroDimension { width: 0, height: 5 })));

        let result = Puzzle::new(vec![PuzzleData::new("masyu", 5, 5, Payload::Url("10~".to_owned()))]);
        assert!(matches!(result, Err(PuzzleError::Decode(DecodeError::InvalidDigit { ch: '~', .. }))));
    }

    #[test]
    fn layered_loop_puzzle() {
        let mut puzzle = PuzzleBuilder::new()
            .add_layer(PuzzleData::new("simpleloop", 3, 2, Payload::Url("00".to_owned())))
            .add_layer(PuzzleData::new("masyu", 3, 2, Payload::Url("30".to_owned())))
            .build()
            .unwrap();
        assert_eq!(puzzle.symbols().len(), 7);

        let solution = solve(&mut puzzle);
        assert_eq!(format!("{}", solution), "┌○┐\n└─┘\n");
        assert_eq!(check_loop(&solution), Ok(()));
    }

    #[test]
    fn ura_masyu() {
        // a white pearl in the corner of a 3x3 grid
        let corner = PuzzleData::new("masyu", 3, 3, Payload::Url("900".to_owned()));

        let mut puzzle = Puzzle::new(vec![corner.clone()]).unwrap();
        assert!(matches!(puzzle.solve(TIMEOUT).unwrap(), Verdict::NoSolution));

        let mut puzzle = PuzzleBuilder::from(vec![corner]).ura_masyu(true).build().unwrap();
        let solution = solve(&mut puzzle);
        assert_eq!(solution.name_at(Point(0, 0)), "SE");
        assert_eq!(solution.name_at(Point(0, 1)), "EW");
        assert_eq!(solution.name_at(Point(1, 0)), "NS");
        assert_eq!(solution.rows()[0].chars().next(), Some('\u{25cb}'));
        assert_eq!(check_loop(&solution), Ok(()));

        // a black pearl in the same corner only works the other way round
        let black = PuzzleData::new("masyu", 3, 3, Payload::Url("i00".to_owned()));
        assert!(matches!(Puzzle::new(vec![black.clone()]).unwrap().solve(TIMEOUT).unwrap(), Verdict::Solved(_)));
        let mut puzzle = PuzzleBuilder::from(vec![black]).ura_masyu(true).build().unwrap();
        assert!(matches!(puzzle.solve(TIMEOUT).unwrap(), Verdict::NoSolution));
    }

    #[test]
    fn one_region_layer() {
        let layer = PuzzleData::new("nurikabe", 2, 2, Payload::Url("1g".to_owned()));
        assert!(matches!(Puzzle::new(vec![layer.clone(), layer.clone()]), Err(PuzzleError::SharedRegions)));

        let givens = Genre::Nurikabe.decode(&layer).unwrap();
        let mut solver = SatSolver::new();
        let grid = SymbolGrid::new(lattice(2, 2), nurikabe::symbols(), &mut solver);
        let mut regions = None;
        let mut ctx = Context { grid: &grid, solver: &mut solver, loops: None, regions: &mut regions, ura_masyu: false };
        givens.add_constraints(&mut ctx).unwrap();
        assert!(matches!(givens.add_constraints(&mut ctx), Err(PuzzleError::SharedRegions)));
        assert!(regions.is_some());
    }

    #[test]
    fn loop_segment_ids() {
        let mut symbols = nurikabe::symbols();
        symbols.merge(&LoopSegment::symbols());
        let mut solver = SatSolver::new();
        let grid = SymbolGrid::new(lattice(2, 2), symbols, &mut solver);
        let loops = LoopConstrainer::new(&grid, &mut solver).unwrap();
        for segment in LoopSegment::VARIANTS {
            assert_eq!(loops.segment(*segment), grid.symbols().index_of(&segment.name()).unwrap());
        }
        assert_eq!(loops.segments_of(LoopSegment::STRAIGHTS), [2, 3]);
        assert_eq!(loops.empty(), Some(8));

        let partial = SymbolSet::new([("NS", "|"), ("EW", "-"), (EMPTY, " ")]);
        let mut solver = SatSolver::new();
        let grid = SymbolGrid::new(lattice(2, 2), partial, &mut solver);
        assert!(LoopConstrainer::new(&grid, &mut solver).is_none());
    }

    #[test]
    fn file_data_source() {
        let mut source = FileDataSource::new("pzprv3\nsimpleloop\n2\n3\n. . .\n. . .\n");
        let mut puzzle = Puzzle::fetch(&mut source, "ignored").unwrap();
        assert_eq!(format!("{}", solve(&mut puzzle)), "┌─┐\n└─┘\n");

        let mut source = FileDataSource::new("not puzzle data");
        assert!(matches!(Puzzle::fetch(&mut source, "ignored"), Err(PuzzleError::Source(_))));
    }
}
