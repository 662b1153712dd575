use crate::Location;

const fn loc(code: &'static str, name: &'static str) -> Location {
    Location { code, name }
}

/// Divisions and districts of Bangladesh with the codes BDJobs expects in the
/// `location` query parameter. Each division is followed by its districts.
pub(crate) static BANGLADESH: &[Location] = &[
    loc("1003", "Dhaka Division"),
    loc("14", "Dhaka"),
    loc("16", "Faridpur"),
    loc("19", "Gazipur"),
    loc("20", "Gopalganj"),
    loc("29", "Kishoreganj"),
    loc("34", "Madaripur"),
    loc("36", "Manikganj"),
    loc("39", "Munshiganj"),
    loc("43", "Narayanganj"),
    loc("44", "Narsingdi"),
    loc("53", "Rajbari"),
    loc("58", "Shariatpur"),
    loc("63", "Tangail"),
    loc("1002", "Chattogram Division"),
    loc("3", "Bandarban"),
    loc("1", "Brahmanbaria"),
    loc("8", "Chandpur"),
    loc("10", "Chattogram"),
    loc("13", "Cox's Bazar"),
    loc("12", "Cumilla"),
    loc("17", "Feni"),
    loc("27", "Khagrachhari"),
    loc("33", "Lakshmipur"),
    loc("48", "Noakhali"),
    loc("55", "Rangamati"),
    loc("1001", "Barishal Division"),
    loc("7", "Barguna"),
    loc("4", "Barishal"),
    loc("5", "Bhola"),
    loc("24", "Jhalakathi"),
    loc("51", "Patuakhali"),
    loc("52", "Pirojpur"),
    loc("1004", "Khulna Division"),
    loc("2", "Bagerhat"),
    loc("11", "Chuadanga"),
    loc("23", "Jashore"),
    loc("25", "Jhenaidah"),
    loc("28", "Khulna"),
    loc("31", "Kushtia"),
    loc("35", "Magura"),
    loc("37", "Meherpur"),
    loc("42", "Narail"),
    loc("57", "Satkhira"),
    loc("1005", "Mymensingh Division"),
    loc("22", "Jamalpur"),
    loc("40", "Mymensingh"),
    loc("46", "Netrokona"),
    loc("59", "Sherpur"),
    loc("1006", "Rajshahi Division"),
    loc("6", "Bogura"),
    loc("9", "Chapainawabganj"),
    loc("26", "Joypurhat"),
    loc("41", "Naogaon"),
    loc("45", "Natore"),
    loc("49", "Pabna"),
    loc("54", "Rajshahi"),
    loc("60", "Sirajganj"),
    loc("1007", "Rangpur Division"),
    loc("15", "Dinajpur"),
    loc("18", "Gaibandha"),
    loc("30", "Kurigram"),
    loc("32", "Lalmonirhat"),
    loc("47", "Nilphamari"),
    loc("50", "Panchagarh"),
    loc("56", "Rangpur"),
    loc("64", "Thakurgaon"),
    loc("1008", "Sylhet Division"),
    loc("21", "Habiganj"),
    loc("38", "Moulvibazar"),
    loc("61", "Sunamganj"),
    loc("62", "Sylhet"),
];
