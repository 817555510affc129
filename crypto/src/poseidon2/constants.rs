// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use math::fields::f31::BaseElement;

use super::{NUM_ROUNDS, STATE_WIDTH};

// INTERNAL LAYER
// ================================================================================================

/// Diagonal of the internal matrix, i.e. the internal matrix is `1 + diag(INTERNAL_DIAG)`, where
/// `1` is the all-ones matrix. The first entry is -2; the last entry is 2^15 rather than 2^14.
pub const INTERNAL_DIAG: [BaseElement; STATE_WIDTH] = BaseElement::new_array([
    2013265919, 1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 32768,
]);

/// 2^-32 mod p; every output of the internal layer is scaled by this value so that results agree
/// with implementations which keep field elements in Montgomery form.
pub const MONTY_INVERSE: BaseElement = BaseElement::new(943718400);

// ROUND CONSTANTS
// ================================================================================================

/// Round constants for the BabyBear Poseidon2 instance of width 16, one row per round.
///
/// Rows 0..4 and 17..21 are used by the external rounds; rows 4..17 by the internal rounds, which
/// read only the first entry of their row. Values are the published constants reduced modulo p.
pub const ROUND_CONSTANTS: [[BaseElement; STATE_WIDTH]; NUM_ROUNDS] = {
    let mut result = [[BaseElement::new(0); STATE_WIDTH]; NUM_ROUNDS];
    let mut i = 0;
    while i < NUM_ROUNDS {
        result[i] = BaseElement::new_array(RAW_ROUND_CONSTANTS[i]);
        i += 1;
    }
    result
};

/// Canonical integer form of [ROUND_CONSTANTS].
pub const RAW_ROUND_CONSTANTS: [[u32; STATE_WIDTH]; NUM_ROUNDS] = [
    [
        96748292,
        1951698684,
        177396853,
        719730562,
        640767983,
        1390633215,
        1716033721,
        1606702601,
        1746607367,
        1466015491,
        1498308946,
        831109173,
        1029197920,
        1969905919,
        83412884,
        1911782445,
    ],
    [
        1693593583,
        759122502,
        1154399525,
        1131812921,
        1080754908,
        53582651,
        893583089,
        6411452,
        1115338635,
        580640471,
        1264354339,
        842931656,
        548879852,
        1595288793,
        1562381995,
        81826002,
    ],
    [
        262554421,
        1563933798,
        1440025885,
        184445025,
        585385439,
        1396647410,
        1575877922,
        1290587480,
        137125468,
        765010148,
        633675867,
        24537442,
        560123907,
        1895729703,
        541515871,
        1783382863,
    ],
    [
        628590563,
        1022477421,
        1659530405,
        245668751,
        12194511,
        201609705,
        286217151,
        66943721,
        506306261,
        1067433949,
        748735911,
        1244250808,
        606038199,
        1169474910,
        73007766,
        558938232,
    ],
    [
        1196780786,
        1434128522,
        747167305,
        954807686,
        1053214930,
        1074411832,
        2003528587,
        1570312929,
        113576933,
        16049344,
        1621249812,
        1032701597,
        351573387,
        1827020997,
        888378655,
        506925662,
    ],
    [
        36046858,
        914260032,
        1898863184,
        1991566610,
        193772436,
        1590247392,
        99286330,
        502985775,
        24413908,
        269498914,
        1973292656,
        891403491,
        1845429189,
        598730442,
        297276732,
        44663898,
    ],
    [
        1492041470,
        786445290,
        1802048050,
        1111591756,
        206747992,
        762187113,
        1991257625,
        927239888,
        738050285,
        1028870679,
        1282466273,
        1059053371,
        834521354,
        138721483,
        1087144882,
        1829862410,
    ],
    [
        1864954859,
        31630597,
        1478942487,
        799012923,
        496734827,
        1507995315,
        755421082,
        1361409515,
        392099473,
        1165187472,
        41931879,
        7935614,
        114353803,
        137482145,
        1685210312,
        1839717303,
    ],
    [
        883677154,
        1074325006,
        992175959,
        970216228,
        1460364169,
        1886404479,
        1590122901,
        620222276,
        466141043,
        407687078,
        1852516800,
        226543855,
        979699862,
        1163403191,
        1608599874,
        1042838527,
    ],
    [
        1765843422,
        536205958,
        156926519,
        1649720295,
        1444912244,
        1108964957,
        384301396,
        201666674,
        1662916865,
        55629272,
        108631393,
        1706239958,
        140427546,
        1626054781,
        992593057,
        1431907253,
    ],
    [
        1418914503,
        1365856753,
        1929449824,
        1429155552,
        1532376874,
        1759208336,
        1621094396,
        141133224,
        826697382,
        1700781391,
        1525898403,
        652815039,
        442484755,
        42033470,
        1064289978,
        1152335780,
    ],
    [
        1404382774,
        186040114,
        1462314652,
        100675329,
        1779573826,
        1573808590,
        1222428883,
        908929360,
        1119462702,
        1675039600,
        1849567013,
        667446787,
        753897224,
        1896396780,
        1129760413,
        1816337955,
    ],
    [
        859661334,
        1885578436,
        180258337,
        308601096,
        1585736583,
        873516500,
        1025033457,
        1035366250,
        25646276,
        906908602,
        1277696101,
        772434369,
        1793238414,
        1505593012,
        654843672,
        113854354,
    ],
    [
        1548195514,
        364790106,
        390914568,
        1472049779,
        1552596765,
        1905886441,
        1611959354,
        1639997383,
        1410680465,
        340857935,
        195613559,
        139364268,
        1434015852,
        1764547786,
        55640413,
        75369899,
    ],
    [
        104929687,
        1459980974,
        1831234737,
        457139004,
        568221707,
        98778642,
        1553747940,
        778738426,
        576325418,
        41126132,
        700296403,
        151213722,
        877920014,
        546846420,
        926528998,
        530203984,
    ],
    [
        178643863,
        1301872539,
        530414574,
        1242280418,
        1211740715,
        1980406244,
        491817402,
        1832532880,
        538768466,
        50301639,
        1352882353,
        1449831887,
        394746545,
        294726285,
        1930169572,
        924016661,
    ],
    [
        1619872446,
        1209523451,
        809116305,
        30100013,
        641906955,
        550981196,
        465383811,
        87157309,
        93614240,
        499042594,
        650406041,
        213480551,
        670242787,
        951073977,
        1446816067,
        339124269,
    ],
    [
        130182653,
        742680828,
        542600513,
        802837101,
        1931786340,
        31204919,
        1709908013,
        925103122,
        1627133772,
        1374470239,
        177883755,
        624229761,
        209862198,
        276092925,
        1820102609,
        974546524,
    ],
    [
        1293393192,
        221548340,
        1188782305,
        223782844,
        235714646,
        296520220,
        10135706,
        1265611492,
        8872228,
        575851471,
        1612560780,
        1913391015,
        1305283056,
        578597757,
        188109355,
        191192067,
    ],
    [
        1564209905,
        140931974,
        446421108,
        857368568,
        1375012945,
        1529454825,
        306140690,
        842312378,
        1246997295,
        1011032842,
        1915270363,
        1218245412,
        466048099,
        976561834,
        814378556,
        13244079,
    ],
    [
        1165280628,
        1203983801,
        1801474112,
        1919627044,
        600240215,
        773269071,
        486685186,
        227516968,
        1415023565,
        502840102,
        199116516,
        510217063,
        166444818,
        1430745893,
        1376516190,
        1775891321,
    ],
];
