/*!

This is the long-form manual for `jury_voting` and `songfest`.

## The jury system

Every participating group (a school, a team) is also a jury. The voters of a
group rank all the *other* groups by handing out the values of the point
scale, each value exactly once. With the song contest scale
`12, 10, 8, 7, 6, 5, 4, 3, 2, 1, 0`, a contest has exactly 12 groups: every
voter distributes 11 values over the 11 other groups.

A group may have any number of voters. Their ballots are merged into one jury
vote:

1. for each recipient, the points of all the voters of the group are averaged
2. the recipients are ranked by decreasing average
3. the recipient at rank `i` receives the value `i` of the scale

The final result adds, for each group, the points received from all the
juries. A group without any voter is not a jury: it hands out no points, but
it still receives points from the other juries.

Several voters from the same group count as several ballots. The tally cannot
tell two voters apart, so limiting the number of votes per person has to
happen when identifying voters.

## Ballot checks

A ballot is rejected, and nothing is recorded, if:

| code                   | reason                                                   |
|------------------------|----------------------------------------------------------|
| `unknown-voter-group`  | the voter does not belong to any group                   |
| `invalid-points`       | a value is not a non-negative integer (`"12"` is fine)   |
| `self-vote`            | the voter's own group received points                    |
| `point-scale-mismatch` | the values are not exactly the scale, each one used once |
| `group-set-mismatch`   | the groups are not exactly all the other groups, once    |

The checks are applied in the order of the table.

## Ties

Exact ties, inside a jury or in the final result, are resolved with the
tiebreak mode of the contest:
* `alphabetical` (default): the group with the first name in byte order
   comes first (upper case letters sort before lower case letters)
* `useGroupOrder`: the group declared first in the configuration comes first

## Configuration

`songfest` reads a JSON configuration file:

```json
{
  "outputSettings": {
    "contestName": "Theaterscholen songfestival",
    "contestDate": "2025-05-17",
    "outputDirectory": "output"
  },
  "groups": [
    { "name": "Antwerpen", "domains": ["ap.be", "uantwerpen.be"] },
    { "name": "Gent", "domains": ["hogent.be"] }
  ],
  "pointScale": [12, 10, 8, 7, 6, 5, 4, 3, 2, 1, 0],
  "rules": { "tiebreakMode": "alphabetical" },
  "ballotSources": [ { "provider": "json", "filePath": "ballots.json" } ]
}
```

- `groups`: the participating groups, in order. `domains` lists the e-mail
  domains of the voters of the group. Sub-domains are accepted
  (`student.hogent.be` belongs to `hogent.be`). When a domain is listed by
  several groups, the first group wins.
- `pointScale` (optional): strictly decreasing and ending with `0`, with one
  value less than the number of groups. Defaults to the song contest scale.
- `rules.tiebreakMode` (optional): `alphabetical` or `useGroupOrder`.
- `ballotSources`: the files holding the ballots, relative to the
  configuration file.

The `outputDirectory` receives a `summary.json` file, unless `--out` is
given.

## Input formats

### `json`

An array of ballots. Each ballot identifies the voter by e-mail address and
gives either points per group or an ordered ranking (favourite first):

```text
[
  { "email": "an@hogent.be", "points": { "Leuven": 12, "Utrecht": "10" } },
  { "email": "jan@kuleuven.be", "ranking": ["Utrecht", "Gent"] }
]
```

### `csv`

The first row is `email` followed by the names of the groups. Each following
row holds the e-mail address of a voter and the points per group. An empty
cell means that the group received no points.

```text
email,Gent,Leuven,Utrecht
an@hogent.be,,12,10
```

### `xlsx`

An Excel export of a form, with a single worksheet. The column titled `email`
identifies the voter, the columns titled with the names of the groups hold
the points. The other columns (start time, name, ...) are ignored.

## Output

The summary is a JSON document with the jury of every group that voted, in
the order of the configuration, and the final ranking. The points of each
jury are listed from its best ranked group to its last one:

```text
{
  "config": { "contest": "...", "date": null, "groups": 3, "ballots": 2, "rejected": 0 },
  "jury": { "Gent": { "Leuven": 12, "Utrecht": 10 } },
  "results": [ { "group": "Leuven", "points": 12 } ]
}
```

 */
