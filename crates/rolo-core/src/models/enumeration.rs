//! Closed vocabularies used by the contact model.
//!
//! Each vocabulary keeps an `Unrecognized` variant so values outside the known
//! set survive a load/save cycle instead of failing deserialization.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// A value outside the known vocabulary, kept verbatim.
            Unrecognized(String),
        }

        impl $name {
            /// Display text of the value.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)+
                    Self::Unrecognized(value) => value,
                }
            }

            /// Parse display text, falling back to `Unrecognized`.
            pub fn from_name(value: &str) -> Self {
                match value {
                    $($text => Self::$variant,)+
                    other => Self::Unrecognized(other.to_string()),
                }
            }

            pub const fn is_recognized(&self) -> bool {
                !matches!(self, Self::Unrecognized(_))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Ok(Self::from_name(&value))
            }
        }
    };
}

vocabulary! {
    /// Country of a street address.
    Country {
        Ireland => "Ireland",
        UnitedStates => "United States",
    }
}

impl Country {
    /// ISO 3166 code the remote service stores next to the country name.
    pub const fn iso_code(&self) -> Option<&'static str> {
        match self {
            Self::Ireland => Some("ie"),
            Self::UnitedStates => Some("us"),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn from_iso_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "ie" => Some(Self::Ireland),
            "us" => Some(Self::UnitedStates),
            _ => None,
        }
    }

    pub const fn dialing_code(&self) -> Option<CountryCode> {
        match self {
            Self::Ireland => Some(CountryCode::Ireland),
            Self::UnitedStates => Some(CountryCode::Nanp),
            Self::Unrecognized(_) => None,
        }
    }
}

/// International dialing codes accepted on phone numbers.
///
/// Declaration order matters: remote numbers are matched against the codes in
/// this order and the first prefix match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum CountryCode {
    /// North American Numbering Plan
    Nanp,
    Ireland,
    UnitedKingdom,
    Belgium,
    Brazil,
    Chile,
    Malaysia,
    Mexico,
    HongKong,
    China,
    Taiwan,
}

impl CountryCode {
    pub const ALL: [Self; 11] = [
        Self::Nanp,
        Self::Ireland,
        Self::UnitedKingdom,
        Self::Belgium,
        Self::Brazil,
        Self::Chile,
        Self::Malaysia,
        Self::Mexico,
        Self::HongKong,
        Self::China,
        Self::Taiwan,
    ];

    pub const fn dialing_code(self) -> u16 {
        match self {
            Self::Nanp => 1,
            Self::Ireland => 353,
            Self::UnitedKingdom => 44,
            Self::Belgium => 32,
            Self::Brazil => 55,
            Self::Chile => 56,
            Self::Malaysia => 60,
            Self::Mexico => 52,
            Self::HongKong => 852,
            Self::China => 86,
            Self::Taiwan => 886,
        }
    }
}

impl TryFrom<u16> for CountryCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|code| code.dialing_code() == value)
            .ok_or_else(|| format!("unsupported country code: {value}"))
    }
}

impl From<CountryCode> for u16 {
    fn from(value: CountryCode) -> Self {
        value.dialing_code()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dialing_code())
    }
}

vocabulary! {
    /// High schools known to the contact book.
    HighSchoolName {
        ActonBoxboroughRegionalHighSchool => "Acton-Boxborough Regional High School",
        AdvancedMathAndScienceAcademyCharterSchool => "Advanced Math and Science Academy Charter School",
        BelmontHillSchool => "Belmont Hill School",
        BrimmerAndMaySchool => "Brimmer and May School",
        BrooklineHighSchool => "Brookline High School",
        BostonUniversityAcademy => "Boston University Academy",
        BurlingtonHighSchool => "Burlington High School",
        CatholicMemorial => "Catholic Memorial",
        ChapinSchool => "Chapin School",
        ColchesterHighSchool => "Colchester High School",
        ColumbiaHighSchool => "Columbia High School",
        ConcordCarlisleRegionalHighSchool => "Concord-Carlisle Regional High School",
        DanaHallSchool => "Dana Hall School",
        DexterSouthfieldSchool => "Dexter Southfield School",
        DoverSherbornHighSchool => "Dover-Sherborn High School",
        FontbonneAcademy => "Fontbonne Academy",
        LexingtonHighSchool => "Lexington High School",
        LincolnSudburyRegionalHighSchool => "Lincoln-Sudbury Regional High School",
        MaldenHighSchool => "Malden High School",
        MiltonAcademy => "Milton Academy",
        NatickHighSchool => "Natick High School",
        NeedhamHighSchool => "Needham High School",
        NewtonNorthHighSchool => "Newton North High School",
        NewtonSouthHighSchool => "Newton South High School",
        NightingaleBamfordSchool => "Nightingale-Bamford School",
        NobleAndGreenoughSchool => "Noble and Greenough School",
        PhillipsAcademy => "Phillips Academy",
        RiversSchool => "Rivers School",
        RoxburyLatinSchool => "Roxbury Latin School",
        SpenceSchool => "Spence School",
        TrinitySchool => "Trinity School",
        UrsulineAcademy => "Ursuline Academy",
        WalpoleHighSchool => "Walpole High School",
        WaylandHighSchool => "Wayland High School",
        WellesleyHighSchool => "Wellesley High School",
        WestonHighSchool => "Weston High School",
        WestwoodHighSchool => "Westwood High School",
        WinchesterHighSchool => "Winchester High School",
        WinsorSchool => "Winsor School",
    }
}

vocabulary! {
    /// Colleges and universities known to the contact book.
    UniversityName {
        AmericanUniversity => "American University",
        AmherstCollege => "Amherst College",
        BabsonCollege => "Babson College",
        BardCollege => "Bard College",
        BatesCollege => "Bates College",
        BentleyUniversity => "Bentley University",
        BerkleeCollegeOfMusic => "Berklee College of Music",
        BinghamtonUniversity => "Binghamton University",
        BostonCollege => "Boston College",
        BostonUniversity => "Boston University",
        BrandeisUniversity => "Brandeis University",
        BrownUniversity => "Brown University",
        BrownUniversityAndRhodeIslandSchoolOfDesign => "Brown University / Rhode Island School of Design",
        BucknellUniversity => "Bucknell University",
        CaliforniaInstituteOfTechnology => "California Institute of Technology",
        CarletonCollege => "Carleton College",
        CarnegieMellonUniversity => "Carnegie Mellon University",
        CaseWesternReserveUniversity => "Case Western Reserve University",
        ClemsonUniversity => "Clemson University",
        ColbyCollege => "Colby College",
        ColbyUniversity => "Colby University",
        ColgateUniversity => "Colgate University",
        CollegeOfTheHolyCross => "College of the Holy Cross",
        ColumbiaUniversity => "Columbia University",
        CornellUniversity => "Cornell University",
        DanmarksTekniskeUniversitet => "Danmarks Tekniske Universitet",
        DartmouthCollege => "Dartmouth College",
        DrexelUniversity => "Drexel University",
        DukeUniversity => "Duke University",
        ElonUniversity => "Elon University",
        EmoryUniversity => "Emory University",
        EndicottCollege => "Endicott College",
        FairfieldUniversity => "Fairfield University",
        FordhamUniversity => "Fordham University",
        GeorgeWashingtonUniversity => "George Washington University",
        GeorgetownUniversity => "Georgetown University",
        GeorgiaInstituteOfTechnology => "Georgia Institute of Technology",
        HamiltonCollege => "Hamilton College",
        HarvardUniversity => "Harvard University",
        HaverfordCollege => "Haverford College",
        HofstraUniversity => "Hofstra University",
        IndianaUniversity => "Indiana University",
        IowaStateUniversity => "Iowa State University",
        IthacaCollege => "Ithaca College",
        JohnCarrollUniversity => "John Carroll University",
        JohnsHopkinsUniversity => "Johns Hopkins University",
        KeeneStateCollege => "Keene State College",
        KenyonCollege => "Kenyon College",
        LehighUniversity => "Lehigh University",
        MacalesterUniversity => "Macalester University",
        ManhattanCollege => "Manhattan College",
        MassachusettsCollegeOfArtAndDesign => "Massachusetts College of Art and Design",
        MassachusettsInstituteOfTechnology => "Massachusetts Institute of Technology",
        McgillUniversity => "McGill University",
        MiddleburyCollege => "Middlebury College",
        NewYorkUniversity => "New York University",
        NorthCarolinaStateUniversity => "North Carolina State University",
        NortheasternUniversity => "Northeastern University",
        NortheasternUniversityAndCornellUniversity => "Northeastern University / Cornell University",
        NorthwesternUniversity => "Northwestern University",
        OhioStateUniversity => "Ohio State University",
        PomonaCollege => "Pomona College",
        PrincetonUniversity => "Princeton University",
        ProvidenceCollege => "Providence College",
        PurdueUniversity => "Purdue University",
        QingdaoUniversity => "Qingdao University",
        QuinnipiacUniversity => "Quinnipiac University",
        RegisCollege => "Regis College",
        RensselaerPolytechnicInstitute => "Rensselaer Polytechnic Institute",
        RutgersUniversity => "Rutgers University",
        SacredHeartUniversity => "Sacred Heart University",
        SaintMichaelsCollege => "Saint Michael's College",
        SanDiegoStateUniversity => "San Diego State University",
        SetonHallUniversity => "Seton Hall University",
        SkidmoreCollege => "Skidmore College",
        SouthernMethodistUniversity => "Southern Methodist University",
        StLawrenceUniversity => "St. Lawrence University",
        StanfordUniversity => "Stanford University",
        SyracuseUniversity => "Syracuse University",
        TheUniversityOfTampa => "The University of Tampa",
        TrinityCollege => "Trinity College",
        TuftsUniversity => "Tufts University",
        UnionCollege => "Union College",
        UnitedStatesMerchantMarineAcademy => "United States Merchant Marine Academy",
        UniversityCollegeLondon => "University College London",
        UniversityOfCaliforniaBerkeley => "University of California, Berkeley",
        UniversityOfCaliforniaLosAngeles => "University of California, Los Angeles",
        UniversityOfCaliforniaSantaBarbara => "University of California, Santa Barbara",
        UniversityOfCaliforniaSantaCruz => "University of California, Santa Cruz",
        UniversityOfChicago => "University of Chicago",
        UniversityOfColoradoBoulder => "University of Colorado Boulder",
        UniversityOfConnecticut => "University of Connecticut",
        UniversityOfDelaware => "University of Delaware",
        UniversityOfMaryland => "University of Maryland",
        UniversityOfMassachusettsAmherst => "University of Massachusetts Amherst",
        UniversityOfMiami => "University of Miami",
        UniversityOfMichigan => "University of Michigan",
        UniversityOfNewHampshire => "University of New Hampshire",
        UniversityOfPennsylvania => "University of Pennsylvania",
        UniversityOfRhodeIsland => "University of Rhode Island",
        UniversityOfRochester => "University of Rochester",
        UniversityOfSouthernCalifornia => "University of Southern California",
        UniversityOfToronto => "University of Toronto",
        UniversityOfVermont => "University of Vermont",
        UniversityOfVirginia => "University of Virginia",
        UniversityOfWashington => "University of Washington",
        UniversityOfWisconsinMadison => "University of Wisconsin-Madison",
        VanderbiltUniversity => "Vanderbilt University",
        VillanovaUniversity => "Villanova University",
        WakeForestUniversity => "Wake Forest University",
        WesleyanUniversity => "Wesleyan University",
        WestfieldStateUniversity => "Westfield State University",
        WheatonCollege => "Wheaton College",
        WhitmanCollege => "Whitman College",
        WilliamsCollege => "Williams College",
        WorcesterPolytechnicInstitute => "Worcester Polytechnic Institute",
        YaleUniversity => "Yale University",
    }
}
