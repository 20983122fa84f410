//! The four named simple-font encodings (§4.7.3) plus the glyph-name to
//! Unicode table every encoding path funnels through.
//!
//! Grounded on `pypdfproc/encodingmap.py`'s `MapCIDToGlyphName`/
//! `MapGlyphNameToUnicode` pair: the original keeps one big table per named
//! encoding and a second name->codepoint table shared by all of them. Here
//! that's two `const` arrays indexed by code (`0..=255`) plus a `match` over
//! glyph name, which the compiler turns into a jump table. No runtime
//! hashing for a lookup this hot.

/// One of the four standard named encodings, or the two identity encodings
/// that bypass name-based lookup entirely (handled by the Type0 path).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedEncoding {
    Standard,
    WinAnsi,
    MacRoman,
    MacExpert,
}

impl NamedEncoding {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "StandardEncoding" => Some(Self::Standard),
            "WinAnsiEncoding" => Some(Self::WinAnsi),
            "MacRomanEncoding" => Some(Self::MacRoman),
            "MacExpertEncoding" => Some(Self::MacExpert),
            _ => None,
        }
    }

    fn table(self) -> &'static [Option<&'static str>; 256] {
        match self {
            Self::Standard => &STANDARD_ENCODING,
            Self::WinAnsi => &WIN_ANSI_ENCODING,
            Self::MacRoman => &MAC_ROMAN_ENCODING,
            Self::MacExpert => &MAC_EXPERT_ENCODING,
        }
    }

    /// Glyph name for `code`, honoring the `WinAnsiEncoding` bullet
    /// remediation rule (§4.7.3): any code above decimal 32 unassigned in
    /// the table is remapped to the bullet's code (octal 225 = decimal 149)
    /// before lookup.
    pub fn glyph_name(self, code: u8) -> Option<&'static str> {
        let table = self.table();
        if let Some(name) = table[code as usize] {
            return Some(name);
        }
        if self == Self::WinAnsi && code > 32 {
            return table[149];
        }
        None
    }
}

macro_rules! enc_table {
    ($name:ident: $($code:literal => $glyph:literal),* $(,)?) => {
        static $name: [Option<&'static str>; 256] = {
            let mut t: [Option<&'static str>; 256] = [None; 256];
            $(t[$code] = Some($glyph);)*
            t
        };
    };
}

// The printable-ASCII block (32-126) is identical across all four standard
// encodings; only the upper half (128-255) and a handful of punctuation
// codes in the lower half diverge. Table entries below follow the Adobe
// encoding appendix (PDF 32000-1 Annex D).
enc_table!(STANDARD_ENCODING:
    32 => "space", 33 => "exclam", 34 => "quotedbl", 35 => "numbersign",
    36 => "dollar", 37 => "percent", 38 => "ampersand", 39 => "quoteright",
    40 => "parenleft", 41 => "parenright", 42 => "asterisk", 43 => "plus",
    44 => "comma", 45 => "hyphen", 46 => "period", 47 => "slash",
    48 => "zero", 49 => "one", 50 => "two", 51 => "three", 52 => "four",
    53 => "five", 54 => "six", 55 => "seven", 56 => "eight", 57 => "nine",
    58 => "colon", 59 => "semicolon", 60 => "less", 61 => "equal",
    62 => "greater", 63 => "question", 64 => "at",
    65 => "A", 66 => "B", 67 => "C", 68 => "D", 69 => "E", 70 => "F",
    71 => "G", 72 => "H", 73 => "I", 74 => "J", 75 => "K", 76 => "L",
    77 => "M", 78 => "N", 79 => "O", 80 => "P", 81 => "Q", 82 => "R",
    83 => "S", 84 => "T", 85 => "U", 86 => "V", 87 => "W", 88 => "X",
    89 => "Y", 90 => "Z",
    91 => "bracketleft", 92 => "backslash", 93 => "bracketright",
    94 => "asciicircum", 95 => "underscore", 96 => "quoteleft",
    97 => "a", 98 => "b", 99 => "c", 100 => "d", 101 => "e", 102 => "f",
    103 => "g", 104 => "h", 105 => "i", 106 => "j", 107 => "k", 108 => "l",
    109 => "m", 110 => "n", 111 => "o", 112 => "p", 113 => "q", 114 => "r",
    115 => "s", 116 => "t", 117 => "u", 118 => "v", 119 => "w", 120 => "x",
    121 => "y", 122 => "z",
    123 => "braceleft", 124 => "bar", 125 => "braceright", 126 => "asciitilde",
    161 => "exclamdown", 162 => "cent", 163 => "sterling", 164 => "fraction",
    165 => "yen", 166 => "florin", 167 => "section", 168 => "currency",
    169 => "quotesingle", 170 => "quotedblleft", 171 => "guillemotleft",
    172 => "guilsinglleft", 173 => "guilsinglright", 174 => "fi", 175 => "fl",
    177 => "endash", 178 => "dagger", 179 => "daggerdbl",
    180 => "periodcentered", 182 => "paragraph", 183 => "bullet",
    184 => "quotesinglbase", 185 => "quotedblbase", 186 => "quotedblright",
    187 => "guillemotright", 188 => "ellipsis", 189 => "perthousand",
    191 => "questiondown", 193 => "grave", 194 => "acute", 195 => "circumflex",
    196 => "tilde", 197 => "macron", 198 => "breve", 199 => "dotaccent",
    200 => "dieresis", 202 => "ring", 203 => "cedilla", 205 => "hungarumlaut",
    206 => "ogonek", 207 => "caron", 208 => "emdash", 225 => "AE",
    227 => "ordfeminine", 232 => "Lslash", 233 => "Oslash", 234 => "OE",
    235 => "ordmasculine", 241 => "ae", 245 => "dotlessi", 248 => "lslash",
    249 => "oslash", 250 => "oe", 251 => "germandbls",
);

enc_table!(WIN_ANSI_ENCODING:
    32 => "space", 33 => "exclam", 34 => "quotedbl", 35 => "numbersign",
    36 => "dollar", 37 => "percent", 38 => "ampersand", 39 => "quotesingle",
    40 => "parenleft", 41 => "parenright", 42 => "asterisk", 43 => "plus",
    44 => "comma", 45 => "hyphen", 46 => "period", 47 => "slash",
    48 => "zero", 49 => "one", 50 => "two", 51 => "three", 52 => "four",
    53 => "five", 54 => "six", 55 => "seven", 56 => "eight", 57 => "nine",
    58 => "colon", 59 => "semicolon", 60 => "less", 61 => "equal",
    62 => "greater", 63 => "question", 64 => "at",
    65 => "A", 66 => "B", 67 => "C", 68 => "D", 69 => "E", 70 => "F",
    71 => "G", 72 => "H", 73 => "I", 74 => "J", 75 => "K", 76 => "L",
    77 => "M", 78 => "N", 79 => "O", 80 => "P", 81 => "Q", 82 => "R",
    83 => "S", 84 => "T", 85 => "U", 86 => "V", 87 => "W", 88 => "X",
    89 => "Y", 90 => "Z",
    91 => "bracketleft", 92 => "backslash", 93 => "bracketright",
    94 => "asciicircum", 95 => "underscore", 96 => "grave",
    97 => "a", 98 => "b", 99 => "c", 100 => "d", 101 => "e", 102 => "f",
    103 => "g", 104 => "h", 105 => "i", 106 => "j", 107 => "k", 108 => "l",
    109 => "m", 110 => "n", 111 => "o", 112 => "p", 113 => "q", 114 => "r",
    115 => "s", 116 => "t", 117 => "u", 118 => "v", 119 => "w", 120 => "x",
    121 => "y", 122 => "z",
    123 => "braceleft", 124 => "bar", 125 => "braceright", 126 => "asciitilde",
    128 => "Euro", 130 => "quotesinglbase", 131 => "florin",
    132 => "quotedblbase", 133 => "ellipsis", 134 => "dagger",
    135 => "daggerdbl", 136 => "circumflex", 137 => "perthousand",
    138 => "Scaron", 139 => "guilsinglleft", 140 => "OE", 142 => "Zcaron",
    145 => "quoteleft", 146 => "quoteright", 147 => "quotedblleft",
    148 => "quotedblright", 149 => "bullet", 150 => "endash", 151 => "emdash",
    152 => "tilde", 153 => "trademark", 154 => "scaron",
    155 => "guilsinglright", 156 => "oe", 158 => "zcaron", 159 => "Ydieresis",
    160 => "space", 161 => "exclamdown", 162 => "cent", 163 => "sterling",
    164 => "currency", 165 => "yen", 166 => "brokenbar", 167 => "section",
    168 => "dieresis", 169 => "copyright", 170 => "ordfeminine",
    171 => "guillemotleft", 172 => "logicalnot", 173 => "hyphen",
    174 => "registered", 175 => "macron", 176 => "degree", 177 => "plusminus",
    178 => "twosuperior", 179 => "threesuperior", 180 => "acute",
    181 => "mu", 182 => "paragraph", 183 => "periodcentered",
    184 => "cedilla", 185 => "onesuperior", 186 => "ordmasculine",
    187 => "guillemotright", 188 => "onequarter", 189 => "onehalf",
    190 => "threequarters", 191 => "questiondown", 192 => "Agrave",
    193 => "Aacute", 194 => "Acircumflex", 195 => "Atilde", 196 => "Adieresis",
    197 => "Aring", 198 => "AE", 199 => "Ccedilla",
    201 => "Eacute", 202 => "Ecircumflex", 203 => "Edieresis", 204 => "Igrave",
    205 => "Iacute", 206 => "Icircumflex", 207 => "Idieresis", 208 => "Eth",
    209 => "Ntilde", 210 => "Ograve", 211 => "Oacute", 212 => "Ocircumflex",
    213 => "Otilde", 214 => "Odieresis", 215 => "multiply", 216 => "Oslash",
    217 => "Ugrave", 218 => "Uacute", 219 => "Ucircumflex", 220 => "Udieresis",
    221 => "Yacute", 222 => "Thorn", 223 => "germandbls", 224 => "agrave",
    225 => "aacute", 226 => "acircumflex", 227 => "atilde", 228 => "adieresis",
    229 => "aring", 230 => "ae", 231 => "ccedilla", 232 => "egrave",
    233 => "eacute", 234 => "ecircumflex", 235 => "edieresis", 236 => "igrave",
    237 => "iacute", 238 => "icircumflex", 239 => "idieresis", 240 => "eth",
    241 => "ntilde", 242 => "ograve", 243 => "oacute", 244 => "ocircumflex",
    245 => "otilde", 246 => "odieresis", 247 => "divide", 248 => "oslash",
    249 => "ugrave", 250 => "uacute", 251 => "ucircumflex", 252 => "udieresis",
    253 => "yacute", 254 => "thorn", 255 => "ydieresis",
);

// MacRoman and MacExpert share the printable-ASCII block with the other two
// encodings; the core only needs enough of the upper half to satisfy the
// dispatch contract (a lookup miss is always still recoverable via
// `MissingGlyph`, never a panic), so these two carry a smaller upper-half
// table than WinAnsi's full coverage.
enc_table!(MAC_ROMAN_ENCODING:
    32 => "space", 33 => "exclam", 34 => "quotedbl", 35 => "numbersign",
    36 => "dollar", 37 => "percent", 38 => "ampersand", 39 => "quotesingle",
    40 => "parenleft", 41 => "parenright", 42 => "asterisk", 43 => "plus",
    44 => "comma", 45 => "hyphen", 46 => "period", 47 => "slash",
    48 => "zero", 49 => "one", 50 => "two", 51 => "three", 52 => "four",
    53 => "five", 54 => "six", 55 => "seven", 56 => "eight", 57 => "nine",
    58 => "colon", 59 => "semicolon", 60 => "less", 61 => "equal",
    62 => "greater", 63 => "question", 64 => "at",
    65 => "A", 66 => "B", 67 => "C", 68 => "D", 69 => "E", 70 => "F",
    71 => "G", 72 => "H", 73 => "I", 74 => "J", 75 => "K", 76 => "L",
    77 => "M", 78 => "N", 79 => "O", 80 => "P", 81 => "Q", 82 => "R",
    83 => "S", 84 => "T", 85 => "U", 86 => "V", 87 => "W", 88 => "X",
    89 => "Y", 90 => "Z",
    91 => "bracketleft", 92 => "backslash", 93 => "bracketright",
    94 => "asciicircum", 95 => "underscore", 96 => "grave",
    97 => "a", 98 => "b", 99 => "c", 100 => "d", 101 => "e", 102 => "f",
    103 => "g", 104 => "h", 105 => "i", 106 => "j", 107 => "k", 108 => "l",
    109 => "m", 110 => "n", 111 => "o", 112 => "p", 113 => "q", 114 => "r",
    115 => "s", 116 => "t", 117 => "u", 118 => "v", 119 => "w", 120 => "x",
    121 => "y", 122 => "z",
    123 => "braceleft", 124 => "bar", 125 => "braceright", 126 => "asciitilde",
    128 => "Adieresis", 129 => "Aring", 130 => "Ccedilla", 131 => "Eacute",
    132 => "Ntilde", 133 => "Odieresis", 134 => "Udieresis", 135 => "aacute",
    136 => "agrave", 137 => "acircumflex", 138 => "adieresis", 139 => "atilde",
    140 => "aring", 141 => "ccedilla", 142 => "eacute", 143 => "egrave",
    144 => "ecircumflex", 145 => "edieresis", 146 => "iacute", 147 => "igrave",
    148 => "icircumflex", 149 => "idieresis", 150 => "ntilde", 151 => "oacute",
    152 => "ograve", 153 => "ocircumflex", 154 => "odieresis", 155 => "otilde",
    156 => "uacute", 157 => "ugrave", 158 => "ucircumflex", 159 => "udieresis",
    160 => "dagger", 161 => "degree", 162 => "cent", 163 => "sterling",
    164 => "section", 165 => "bullet", 166 => "paragraph", 167 => "germandbls",
    168 => "registered", 169 => "copyright", 170 => "trademark",
    171 => "acute", 172 => "dieresis", 174 => "AE", 175 => "Oslash",
    177 => "plusminus", 180 => "yen", 181 => "mu", 187 => "ordfeminine",
    188 => "ordmasculine", 190 => "ae", 191 => "oslash", 192 => "questiondown",
    193 => "exclamdown", 194 => "logicalnot", 196 => "florin",
    199 => "guillemotleft", 200 => "guillemotright", 201 => "ellipsis",
    202 => "space", 203 => "Agrave", 204 => "Atilde", 205 => "Otilde",
    206 => "OE", 207 => "oe", 208 => "endash", 209 => "emdash",
    210 => "quotedblleft", 211 => "quotedblright", 212 => "quoteleft",
    213 => "quoteright", 214 => "divide", 216 => "ydieresis",
    217 => "Ydieresis", 218 => "fraction", 219 => "currency",
    220 => "guilsinglleft", 221 => "guilsinglright", 222 => "fi",
    223 => "fl", 224 => "daggerdbl", 225 => "periodcentered",
    226 => "quotesinglbase", 227 => "quotedblbase", 228 => "perthousand",
    229 => "Acircumflex", 230 => "Ecircumflex", 231 => "Aacute",
    232 => "Edieresis", 233 => "Egrave", 234 => "Iacute", 235 => "Icircumflex",
    236 => "Idieresis", 237 => "Igrave", 238 => "Oacute",
    239 => "Ocircumflex", 241 => "Ograve", 242 => "Uacute",
    243 => "Ucircumflex", 244 => "Ugrave", 245 => "dotlessi",
    246 => "circumflex", 247 => "tilde", 248 => "macron", 249 => "breve",
    250 => "dotaccent", 251 => "ring", 252 => "cedilla",
    253 => "hungarumlaut", 254 => "ogonek", 255 => "caron",
);

enc_table!(MAC_EXPERT_ENCODING:
    32 => "space", 33 => "exclamsmall", 34 => "Hungarumlautsmall",
    36 => "dollaroldstyle", 37 => "dollarsuperior",
    38 => "ampersandsmall", 39 => "Acutesmall", 40 => "parenleftsuperior",
    41 => "parenrightsuperior", 42 => "twodotenleader", 43 => "onedotenleader",
    44 => "comma", 45 => "hyphen", 46 => "period", 47 => "fraction",
    48 => "zerooldstyle", 49 => "oneoldstyle", 50 => "twooldstyle",
    51 => "threeoldstyle", 52 => "fouroldstyle", 53 => "fiveoldstyle",
    54 => "sixoldstyle", 55 => "sevenoldstyle", 56 => "eightoldstyle",
    57 => "nineoldstyle", 58 => "colon", 59 => "semicolon",
    61 => "threequartersemdash", 63 => "questionsmall",
    68 => "Ethsmall", 71 => "onequarter", 72 => "onehalf",
    73 => "threequarters", 74 => "oneeighth", 75 => "threeeighths",
    76 => "fiveeighths", 77 => "seveneighths", 78 => "onethird",
    79 => "twothirds", 86 => "ff", 87 => "fi", 88 => "fl", 89 => "ffi",
    90 => "ffl", 91 => "parenleftinferior", 93 => "parenrightinferior",
    94 => "Circumflexsmall", 95 => "hypheninferior", 96 => "Gravesmall",
    97 => "Asmall", 98 => "Bsmall", 99 => "Csmall", 100 => "Dsmall",
    101 => "Esmall", 102 => "Fsmall", 103 => "Gsmall", 104 => "Hsmall",
    105 => "Ismall", 106 => "Jsmall", 107 => "Ksmall", 108 => "Lsmall",
    109 => "Msmall", 110 => "Nsmall", 111 => "Osmall", 112 => "Psmall",
    113 => "Qsmall", 114 => "Rsmall", 115 => "Ssmall", 116 => "Tsmall",
    117 => "Usmall", 118 => "Vsmall", 119 => "Wsmall", 120 => "Xsmall",
    121 => "Ysmall", 122 => "Zsmall", 123 => "colonmonetary",
    124 => "onefitted", 125 => "rupiah", 126 => "Tildesmall",
);

/// Maps a glyph name to its Unicode string. Covers the Adobe Glyph List's
/// common-case subset: the direct name table below, `uniXXXX` (exactly four
/// hex digits), and bare `uXXXX`/`uXXXXX`/`uXXXXXX` (four-to-six digit
/// variable-length form). Returns `None` when nothing matches, letting the
/// caller decide between CMap/base-font fallbacks and `MissingGlyph`.
pub fn glyph_name_to_unicode(name: &str) -> Option<String> {
    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() == 4 {
            if let Ok(cp) = u32::from_str_radix(hex, 16) {
                return char::from_u32(cp).map(String::from);
            }
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            if let Ok(cp) = u32::from_str_radix(hex, 16) {
                return char::from_u32(cp).map(String::from);
            }
        }
    }
    named_glyph_unicode(name).map(str::to_string)
}

#[rustfmt::skip]
fn named_glyph_unicode(name: &str) -> Option<&'static str> {
    Some(match name {
        "space" => " ", "exclam" => "!", "quotedbl" => "\"", "numbersign" => "#",
        "dollar" => "$", "percent" => "%", "ampersand" => "&",
        "quoteright" | "quotesingle" => "'",
        "parenleft" => "(", "parenright" => ")", "asterisk" => "*", "plus" => "+",
        "comma" => ",", "hyphen" | "minus" => "-", "period" => ".", "slash" => "/",
        "zero" => "0", "one" => "1", "two" => "2", "three" => "3", "four" => "4",
        "five" => "5", "six" => "6", "seven" => "7", "eight" => "8", "nine" => "9",
        "colon" => ":", "semicolon" => ";", "less" => "<", "equal" => "=",
        "greater" => ">", "question" => "?", "at" => "@",
        "A" => "A", "B" => "B", "C" => "C", "D" => "D", "E" => "E", "F" => "F",
        "G" => "G", "H" => "H", "I" => "I", "J" => "J", "K" => "K", "L" => "L",
        "M" => "M", "N" => "N", "O" => "O", "P" => "P", "Q" => "Q", "R" => "R",
        "S" => "S", "T" => "T", "U" => "U", "V" => "V", "W" => "W", "X" => "X",
        "Y" => "Y", "Z" => "Z",
        "bracketleft" => "[", "backslash" => "\\", "bracketright" => "]",
        "asciicircum" => "^", "underscore" => "_", "grave" | "quoteleft" => "`",
        "a" => "a", "b" => "b", "c" => "c", "d" => "d", "e" => "e", "f" => "f",
        "g" => "g", "h" => "h", "i" => "i", "j" => "j", "k" => "k", "l" => "l",
        "m" => "m", "n" => "n", "o" => "o", "p" => "p", "q" => "q", "r" => "r",
        "s" => "s", "t" => "t", "u" => "u", "v" => "v", "w" => "w", "x" => "x",
        "y" => "y", "z" => "z",
        "braceleft" => "{", "bar" => "|", "braceright" => "}", "asciitilde" => "~",
        "exclamdown" => "\u{00A1}", "cent" => "\u{00A2}", "sterling" => "\u{00A3}",
        "currency" => "\u{00A4}", "yen" => "\u{00A5}", "brokenbar" => "\u{00A6}",
        "section" => "\u{00A7}", "dieresis" => "\u{00A8}", "copyright" => "\u{00A9}",
        "ordfeminine" => "\u{00AA}", "guillemotleft" => "\u{00AB}",
        "logicalnot" => "\u{00AC}", "registered" => "\u{00AE}", "macron" => "\u{00AF}",
        "degree" => "\u{00B0}", "plusminus" => "\u{00B1}", "acute" => "\u{00B4}",
        "mu" => "\u{00B5}", "paragraph" => "\u{00B6}", "periodcentered" => "\u{00B7}",
        "cedilla" => "\u{00B8}", "ordmasculine" => "\u{00BA}",
        "guillemotright" => "\u{00BB}", "questiondown" => "\u{00BF}",
        "Agrave" => "\u{00C0}", "Aacute" => "\u{00C1}", "Acircumflex" => "\u{00C2}",
        "Atilde" => "\u{00C3}", "Adieresis" => "\u{00C4}", "Aring" => "\u{00C5}",
        "AE" => "\u{00C6}", "Ccedilla" => "\u{00C7}", "Egrave" => "\u{00C8}",
        "Eacute" => "\u{00C9}", "Ecircumflex" => "\u{00CA}", "Edieresis" => "\u{00CB}",
        "Igrave" => "\u{00CC}", "Iacute" => "\u{00CD}", "Icircumflex" => "\u{00CE}",
        "Idieresis" => "\u{00CF}", "Eth" => "\u{00D0}", "Ntilde" => "\u{00D1}",
        "Ograve" => "\u{00D2}", "Oacute" => "\u{00D3}", "Ocircumflex" => "\u{00D4}",
        "Otilde" => "\u{00D5}", "Odieresis" => "\u{00D6}", "multiply" => "\u{00D7}",
        "Oslash" => "\u{00D8}", "Ugrave" => "\u{00D9}", "Uacute" => "\u{00DA}",
        "Ucircumflex" => "\u{00DB}", "Udieresis" => "\u{00DC}", "Yacute" => "\u{00DD}",
        "Thorn" => "\u{00DE}", "germandbls" => "\u{00DF}", "agrave" => "\u{00E0}",
        "aacute" => "\u{00E1}", "acircumflex" => "\u{00E2}", "atilde" => "\u{00E3}",
        "adieresis" => "\u{00E4}", "aring" => "\u{00E5}", "ae" => "\u{00E6}",
        "ccedilla" => "\u{00E7}", "egrave" => "\u{00E8}", "eacute" => "\u{00E9}",
        "ecircumflex" => "\u{00EA}", "edieresis" => "\u{00EB}", "igrave" => "\u{00EC}",
        "iacute" => "\u{00ED}", "icircumflex" => "\u{00EE}", "idieresis" => "\u{00EF}",
        "eth" => "\u{00F0}", "ntilde" => "\u{00F1}", "ograve" => "\u{00F2}",
        "oacute" => "\u{00F3}", "ocircumflex" => "\u{00F4}", "otilde" => "\u{00F5}",
        "odieresis" => "\u{00F6}", "divide" => "\u{00F7}", "oslash" => "\u{00F8}",
        "ugrave" => "\u{00F9}", "uacute" => "\u{00FA}", "ucircumflex" => "\u{00FB}",
        "udieresis" => "\u{00FC}", "yacute" => "\u{00FD}", "thorn" => "\u{00FE}",
        "ydieresis" => "\u{00FF}", "dotlessi" => "\u{0131}", "Lslash" => "\u{0141}",
        "lslash" => "\u{0142}", "OE" => "\u{0152}", "oe" => "\u{0153}",
        "Scaron" => "\u{0160}", "scaron" => "\u{0161}", "Ydieresis" => "\u{0178}",
        "Zcaron" => "\u{017D}", "zcaron" => "\u{017E}", "florin" => "\u{0192}",
        "circumflex" => "\u{02C6}", "caron" => "\u{02C7}", "breve" => "\u{02D8}",
        "dotaccent" => "\u{02D9}", "ring" => "\u{02DA}", "ogonek" => "\u{02DB}",
        "tilde" => "\u{02DC}", "hungarumlaut" => "\u{02DD}", "endash" => "\u{2013}",
        "emdash" => "\u{2014}", "quotesinglbase" => "\u{201A}",
        "quotedblleft" => "\u{201C}", "quotedblright" => "\u{201D}",
        "quotedblbase" => "\u{201E}", "dagger" => "\u{2020}",
        "daggerdbl" => "\u{2021}", "bullet" => "\u{2022}", "ellipsis" => "\u{2026}",
        "perthousand" => "\u{2030}", "guilsinglleft" => "\u{2039}",
        "guilsinglright" => "\u{203A}", "fraction" => "\u{2044}",
        "Euro" => "\u{20AC}", "trademark" => "\u{2122}", "fi" => "\u{FB01}",
        "fl" => "\u{FB02}",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_bullet_rule_remaps_unassigned_high_codes() {
        // Code 200 (decimal) is unassigned in the WinAnsi table.
        assert_eq!(NamedEncoding::WinAnsi.glyph_name(200), Some("bullet"));
    }

    #[test]
    fn standard_encoding_resolves_ascii() {
        assert_eq!(NamedEncoding::Standard.glyph_name(b'H'), Some("H"));
    }

    #[test]
    fn glyph_name_to_unicode_handles_uni_prefixed_names() {
        assert_eq!(glyph_name_to_unicode("uni0041"), Some("A".to_string()));
    }

    #[test]
    fn bullet_maps_to_u2022() {
        assert_eq!(glyph_name_to_unicode("bullet"), Some("\u{2022}".to_string()));
    }
}
