//! Integration tests for tally records

use mctools_output::{read_output, read_tally, MissCategory, OutputFile, TallyRecord};
use rstest::{fixture, rstest};

#[fixture]
fn singles() -> OutputFile {
    read_output("./data/singles.io").unwrap()
}

#[rstest]
fn standard_tally_numbers(singles: OutputFile) {
    assert_eq!(singles.tally_numbers(), vec![1, 2, 4, 5, 6, 8]);
    assert_eq!(singles.num_tallies, 6);
    for tally in &singles.tally_data {
        assert_eq!(tally.nps, 1_000_000);
        assert_eq!(tally.particle, "photons");
    }
}

#[rstest]
#[case(1, 1.16486E+00, 0.0006)] // case 1
#[case(2, 4.31795E-03, 0.0015)] // case 2
#[case(4, 1.91076E-03, 0.0006)] // case 3
#[case(5, 3.42950E-04, 0.0025)] // case 4
#[case(6, 4.30567E-05, 0.0002)] // case 5
#[case(8, 1.00000E+00, 0.0000)] // case 6
fn unbinned_results(singles: OutputFile, #[case] number: u32, #[case] value: f64, #[case] error: f64) {
    let tally = singles.get_tally(number).unwrap();
    assert_eq!(tally.tally_type, number);
    assert_eq!(tally.shape(), &[1]);
    assert_eq!(tally.result[[0]], value);
    assert_eq!(tally.err[[0]], error);
    assert_eq!(tally.eng, None);
    assert_eq!(tally.times, None);
}

#[rstest]
fn normalisation_lists(singles: OutputFile) {
    let t2 = singles.get_tally(2).unwrap();
    assert_eq!(t2.surfaces, Some(vec!["1".to_string()]));
    assert_eq!(t2.vols, Some(vec!["1.25664E+03".to_string()]));
    assert_eq!(t2.cells, None);

    let t4 = singles.get_tally(4).unwrap();
    assert_eq!(t4.cells, Some(vec!["2".to_string()]));
    assert_eq!(t4.vols, Some(vec!["3.66519E+03".to_string()]));

    let t6 = singles.get_tally(6).unwrap();
    assert_eq!(t6.cells, Some(vec!["2".to_string()]));
    assert_eq!(t6.vols, Some(vec!["9.89602E+03".to_string()]));

    // pulse height tallies print no normalisation
    let t8 = singles.get_tally(8).unwrap();
    assert_eq!(t8.cells, Some(vec!["2".to_string()]));
    assert_eq!(t8.vols, None);
}

#[rstest]
fn point_detector(singles: OutputFile) {
    let detector = singles.get_tally(5).unwrap().detector.clone().unwrap();
    assert_eq!([detector.x, detector.y, detector.z], [15.0, 0.0, 0.0]);
    assert_eq!(detector.largest_score, 2.32897E-01);
    assert_eq!(detector.largest_score_nps, 492485);
    assert_eq!(detector.average_per_history, 3.42950E-04);
    assert_eq!(detector.misses(MissCategory::RussianRouletteInTransmission), 935317);
    assert_eq!(detector.misses(MissCategory::UnderflowInTransmission), 39376);
    assert_eq!(detector.misses(MissCategory::PscZero), 0);
    assert_eq!(detector.misses.len(), 6);

    // nothing else has detector data
    assert!(singles.get_tally(4).unwrap().detector.is_none());
}

#[rstest]
#[case(1, 2.92000E-02)] // case 1
#[case(2, 1.92767E-04)] // case 2
#[case(4, 1.20226E-04)] // case 3
#[case(5, 1.20831E-05)] // case 4
#[case(6, 5.21372E-06)] // case 5
#[case(8, 1.13240E-03)] // case 6
fn energy_binned(#[case] number: u32, #[case] first: f64) {
    let tally = read_tally("./data/singles_erg.io", number).unwrap();
    let eng = tally.eng.as_ref().unwrap();

    assert_eq!(eng.len(), 14);
    assert_eq!(eng.first().unwrap(), "1.0000E-02");
    assert_eq!(eng.last().unwrap(), "total");
    assert_eq!(tally.times, None);
    assert_eq!(tally.shape(), &[14]);
    assert_eq!(tally.result[[0]], first);
}

#[rstest]
#[case(1, 2.44655E-01, 0.0039)] // case 1
#[case(2, 2.69842E-04, 0.0054)] // case 2
#[case(4, 1.91076E-03, 0.0041)] // case 3
fn time_binned(#[case] number: u32, #[case] total: f64, #[case] error: f64) {
    let tally = read_tally("./data/singles_t.io", number).unwrap();
    let times = tally.times.as_ref().unwrap();

    assert_eq!(tally.nps, 200000);
    assert_eq!(times.len(), 14);
    assert_eq!(times.last().unwrap(), "total");
    assert_eq!(tally.eng, None);
    assert_eq!(tally.shape(), &[14]);
    assert_eq!(tally.result[[13]], total);
    assert_eq!(tally.err[[13]], error);
}

#[rstest]
#[case(2, 1.0E-06, 4.31795E-03)] // case 1
#[case(4, 1.0E-07, 1.91076E-03)] // case 2
fn energy_and_time_binned(#[case] number: u32, #[case] scale: f64, #[case] total: f64) {
    let tally = read_tally("./data/singles_et.io", number).unwrap();

    assert!(tally.is_dual_binned());
    assert_eq!(tally.shape(), &[15, 15]);
    assert_eq!(tally.eng.as_ref().unwrap().last().unwrap(), "total");
    assert_eq!(tally.times.as_ref().unwrap().last().unwrap(), "total");

    // columns from the second chunk of times land in place
    assert_eq!(tally.times.as_ref().unwrap()[4], "5.0000E+01");
    assert_eq!(tally.result[[0, 4]], format!("{:.5E}", scale * 5.0).parse::<f64>().unwrap());
    assert_eq!(tally.err[[0, 4]], 0.0005);
    assert_eq!(tally.err[[14, 0]], 0.0015);
    assert_eq!(tally.result[[14, 14]], total);
}

#[test]
fn single_tally_matches_full_read() {
    let full = read_output("./data/singles_et.io").unwrap();
    let single: TallyRecord = read_tally("./data/singles_et.io", 4).unwrap();
    assert_eq!(full.get_tally(4), Some(&single));
}

#[test]
fn missing_tally() {
    let result = read_tally("./data/singles.io", 14);
    assert!(matches!(result, Err(mctools_output::Error::TallyNotFound(14))));
}
