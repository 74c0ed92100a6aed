// Copyright (c) 2026 rezky_nightky

pub const DEFAULT_GREETING: &str = "Merry Christmas\n2026\n\nWishing you a beautiful year\n\nclick the sky for a special celebration!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Body,
    Hint,
    Border,
    /// Blank cell inside a bordered box.
    Fill,
    Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub col: u16,
    pub row: u16,
    pub ch: char,
    pub style: TextStyle,
}

/// Static text drawn above every layer: the greeting, centred, and the
/// music indicator in the bottom-left corner.
pub struct Overlay {
    text: Option<String>,
    border: bool,
    greeting: Vec<Glyph>,
    status: Vec<Glyph>,
}

/// Styles per source line: the first paragraph is the title, the last one a
/// hint (when there is more than one), anything between is body text.
fn line_styles(lines: &[&str]) -> Vec<TextStyle> {
    let mut para = 0usize;
    let mut para_of = Vec::with_capacity(lines.len());
    let mut prev_blank = false;
    for (i, l) in lines.iter().enumerate() {
        let blank = l.trim().is_empty();
        if !blank && prev_blank && i > 0 {
            para += 1;
        }
        para_of.push(para);
        prev_blank = blank;
    }
    let last = para;
    para_of
        .into_iter()
        .map(|p| match p {
            0 => TextStyle::Title,
            p if p == last => TextStyle::Hint,
            _ => TextStyle::Body,
        })
        .collect()
}

impl Overlay {
    pub fn new(text: Option<String>, border: bool) -> Self {
        Self {
            text,
            border,
            greeting: Vec::new(),
            status: Vec::new(),
        }
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.greeting.iter().chain(self.status.iter())
    }

    pub fn layout(&mut self, cols: u16, rows: u16) {
        self.greeting.clear();
        let Some(text) = self.text.as_deref() else {
            return;
        };

        let pad_x: u16 = 2;
        let pad_y: u16 = 1;
        let border: u16 = if self.border { 1 } else { 0 };

        let frame_w = 2 * border + 2 * pad_x;
        let frame_h = 2 * border + 2 * pad_y;
        if cols <= frame_w || rows <= frame_h {
            return;
        }
        let max_w = (cols - frame_w) as usize;
        let max_h = (rows - frame_h) as usize;

        let raw: Vec<&str> = text.split('\n').collect();
        let styles = line_styles(&raw);

        let mut content: Vec<(Vec<char>, TextStyle)> = Vec::new();
        'lines: for (line, style) in raw.iter().zip(styles) {
            let chars: Vec<char> = line.chars().collect();
            if chars.is_empty() {
                if content.len() >= max_h {
                    break;
                }
                content.push((Vec::new(), style));
                continue;
            }
            for chunk in chars.chunks(max_w) {
                if content.len() >= max_h {
                    break 'lines;
                }
                content.push((chunk.to_vec(), style));
            }
        }
        if content.is_empty() {
            return;
        }

        let content_w = content.iter().map(|(l, _)| l.len()).max().unwrap_or(0).max(1) as u16;
        let content_h = content.len() as u16;
        let box_w = content_w + frame_w;
        let box_h = content_h + frame_h;
        let start_col = (cols - box_w.min(cols)) / 2;
        let start_row = (rows - box_h.min(rows)) / 2;

        for y in 0..box_h {
            for x in 0..box_w {
                let (col, row) = (start_col + x, start_row + y);
                if col >= cols || row >= rows {
                    continue;
                }

                let inner_x = x.checked_sub(border + pad_x).filter(|v| *v < content_w);
                let inner_y = y.checked_sub(border + pad_y).filter(|v| *v < content_h);
                if let (Some(ix), Some(iy)) = (inner_x, inner_y) {
                    let (line, style) = &content[iy as usize];
                    let left = (content_w as usize - line.len()) / 2;
                    let ix = ix as usize;
                    if ix >= left && ix < left + line.len() && line[ix - left] != ' ' {
                        self.greeting.push(Glyph {
                            col,
                            row,
                            ch: line[ix - left],
                            style: *style,
                        });
                        continue;
                    }
                }

                if border == 0 {
                    continue;
                }
                let edge_y = y == 0 || y + 1 == box_h;
                let edge_x = x == 0 || x + 1 == box_w;
                let (ch, style) = match (edge_x, edge_y) {
                    (true, true) => ('+', TextStyle::Border),
                    (false, true) => ('-', TextStyle::Border),
                    (true, false) => ('|', TextStyle::Border),
                    (false, false) => (' ', TextStyle::Fill),
                };
                self.greeting.push(Glyph { col, row, ch, style });
            }
        }
    }

    /// Bottom-left indicator; replaces the previous one.
    pub fn set_status(&mut self, text: &str, cols: u16, rows: u16) {
        self.status.clear();
        if rows == 0 {
            return;
        }
        let row = if rows >= 3 { rows - 2 } else { rows - 1 };
        let start = if cols > 24 { 2 } else { 0 };
        for (i, ch) in text.chars().enumerate() {
            let col = start + i as u16;
            if col >= cols {
                break;
            }
            self.status.push(Glyph {
                col,
                row,
                ch,
                style: TextStyle::Status,
            });
        }
    }

    pub fn status_hit(&self, col: u16, row: u16) -> bool {
        match (self.status.first(), self.status.last()) {
            (Some(first), Some(last)) => row == first.row && (first.col..=last.col).contains(&col),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(o: &Overlay, row: u16) -> String {
        o.glyphs()
            .filter(|g| g.row == row && g.style != TextStyle::Status)
            .map(|g| g.ch)
            .collect()
    }

    #[test]
    fn greeting_is_centred() {
        let mut o = Overlay::new(Some("ab\ncdef".to_string()), false);
        o.layout(20, 10);
        // box 4+4 wide, 2+2 tall, so content starts at col 8, row 4.
        let title: Vec<&Glyph> = o.glyphs().filter(|g| g.row == 4).collect();
        assert_eq!(title.iter().map(|g| g.col).collect::<Vec<_>>(), vec![9, 10]);
        assert_eq!(text_of(&o, 5), "cdef");
    }

    #[test]
    fn paragraphs_get_title_body_and_hint_styles() {
        let styles = line_styles(&["Merry", "2026", "", "body", "", "hint"]);
        assert_eq!(
            styles,
            vec![
                TextStyle::Title,
                TextStyle::Title,
                TextStyle::Title,
                TextStyle::Body,
                TextStyle::Body,
                TextStyle::Hint,
            ]
        );
        assert_eq!(line_styles(&["only"]), vec![TextStyle::Title]);
    }

    #[test]
    fn long_lines_wrap_and_overflow_is_cut() {
        let mut o = Overlay::new(Some("abcdefghij\nk\nl\nm".to_string()), false);
        o.layout(10, 5);
        // 6 columns and 3 rows of room.
        assert_eq!(text_of(&o, 1), "abcdef");
        assert_eq!(text_of(&o, 2), "ghij");
        assert_eq!(text_of(&o, 3), "k");
        assert!(o.glyphs().all(|g| g.row < 4));
    }

    #[test]
    fn border_frames_the_box() {
        let mut o = Overlay::new(Some("hi".to_string()), true);
        o.layout(20, 10);
        let corners = o.glyphs().filter(|g| g.ch == '+').count();
        assert_eq!(corners, 4);
        assert!(o.glyphs().any(|g| g.style == TextStyle::Fill));
    }

    #[test]
    fn tiny_terminal_shows_no_greeting() {
        let mut o = Overlay::new(Some("hello".to_string()), false);
        o.layout(4, 2);
        assert_eq!(o.glyphs().count(), 0);
    }

    #[test]
    fn status_sits_bottom_left_and_is_clickable() {
        let mut o = Overlay::new(None, false);
        o.set_status("music", 80, 24);
        assert!(o.status_hit(2, 22));
        assert!(o.status_hit(6, 22));
        assert!(!o.status_hit(7, 22));
        assert!(!o.status_hit(2, 23));

        o.set_status("", 80, 24);
        assert!(!o.status_hit(2, 22));
    }
}
